use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use super::trainfile::{TrainDefinition, parse_train};
use crate::ConsistError;

pub const TRAINS_DIR :&str = "TRAINS";
pub const TRAINSET_DIR :&str = "TRAINSET";
pub const CONSISTS_DIR :&str = "CONSISTS";
pub const TRAIN_FILE_EXTENSION :&str = "train-or";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Engine,
    Wagon,
}

impl AssetKind {
    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::Engine => "eng",
            AssetKind::Wagon => "wag",
        }
    }
}

/// A content installation: the root directory that unqualified names are
/// resolved against, and a table of named install folders that
/// `folder:name` references select instead.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub root: PathBuf,
    pub folders: HashMap<String, PathBuf>,
}

impl Content {
    pub fn new<P: Into<PathBuf>>(root :P) -> Content {
        Content { root: root.into(), folders: HashMap::new() }
    }

    pub fn with_folders<P: Into<PathBuf>>(root :P, folders :HashMap<String, PathBuf>) -> Content {
        Content { root: root.into(), folders: folders }
    }

    /// Recovers the content root from a file stored in the standard
    /// `TRAINS/CONSISTS` directory.
    pub fn infer_root(train_file :&Path) -> Option<PathBuf> {
        let consists = train_file.parent()?;
        let trains = consists.parent()?;
        let matches = |p :&Path, dir :&str| p.file_name()
            .map(|n| n.to_string_lossy().eq_ignore_ascii_case(dir))
            .unwrap_or(false);
        if matches(consists, CONSISTS_DIR) && matches(trains, TRAINS_DIR) {
            trains.parent().map(|p| p.to_path_buf())
        } else {
            None
        }
    }

    pub fn trainset_path(&self) -> PathBuf {
        self.root.join(TRAINS_DIR).join(TRAINSET_DIR)
    }

    pub fn consists_path(&self) -> PathBuf {
        self.root.join(TRAINS_DIR).join(CONSISTS_DIR)
    }

    /// Splits an optional `folder:` qualifier off `name` and returns the
    /// install path it selects.
    fn install_path<'n>(&self, name :&'n str) -> Result<(&Path, &'n str), ConsistError> {
        match name.find(':') {
            Some(i) => {
                let (folder, rest) = (&name[..i], &name[i + 1..]);
                match self.folders.get(folder) {
                    Some(path) => Ok((path.as_path(), rest)),
                    None => Err(ConsistError::AssetPathUnresolved(folder.to_string(), name.to_string())),
                }
            },
            None => Ok((self.root.as_path(), name)),
        }
    }

    fn locate(&self, name :&str, dir :&str, extension :&str) -> Result<PathBuf, ConsistError> {
        let (base, relative) = self.install_path(name)?;
        let mut parts = relative.split(|c :char| c == '/' || c == '\\').filter(|p| !p.is_empty()).peekable();
        if parts.peek().is_none() {
            return Err(ConsistError::AssetPathUnresolved(String::new(), name.to_string()));
        }

        let mut path = base.join(TRAINS_DIR).join(dir);
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                path.push(part);
            } else {
                path.push(format!("{}.{}", part, extension));
            }
        }
        Ok(path)
    }

    /// Maps a bare engine or wagon name to its file in the trainset.
    pub fn resolve_asset_path(&self, kind :AssetKind, name :&str) -> Result<PathBuf, ConsistError> {
        self.locate(name, TRAINSET_DIR, kind.extension())
    }

    pub fn train_definition_path(&self, name :&str) -> Result<PathBuf, ConsistError> {
        self.locate(name, CONSISTS_DIR, TRAIN_FILE_EXTENSION)
    }
}

/// Source of nested train definitions.
pub trait TrainLoader {
    fn load_train(&self, name :&str) -> Result<TrainDefinition, ConsistError>;
}

/// Loads `.train-or` files from the consists directory of a content tree.
pub struct FileLoader<'a> {
    content: &'a Content,
}

impl<'a> FileLoader<'a> {
    pub fn new(content :&'a Content) -> FileLoader<'a> {
        FileLoader { content }
    }
}

impl<'a> TrainLoader for FileLoader<'a> {
    fn load_train(&self, name :&str) -> Result<TrainDefinition, ConsistError> {
        let path = self.content.train_definition_path(name)?;
        debug!("loading train {:?} from {}", name, path.display());
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound =>
                return Err(ConsistError::DefinitionNotFound(name.to_string())),
            Err(e) => return Err(ConsistError::Io(path.display().to_string(), e)),
        };
        parse_train(name, &contents)
    }
}

impl TrainLoader for HashMap<String, TrainDefinition> {
    fn load_train(&self, name :&str) -> Result<TrainDefinition, ConsistError> {
        self.get(name).cloned().ok_or_else(|| ConsistError::DefinitionNotFound(name.to_string()))
    }
}
