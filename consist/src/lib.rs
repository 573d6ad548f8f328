extern crate smallvec;
extern crate serde;
extern crate serde_json;
extern crate failure;
#[macro_use] extern crate failure_derive;
#[macro_use] extern crate log;

pub mod input;
pub mod formation;
pub mod output;


use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use input::content::{Content, FileLoader};
use input::trainfile::TrainDefinition;
use formation::{Resolver, WagonReference, PreferredLocomotive, LeadLocomotiveChoices};

pub type AppResult<T> = Result<T, failure::Error>;

/// Everything that can make a consist resolution fail.
///
/// An unsatisfiable locomotive preference is not among these; it yields
/// an empty wagon list.
#[derive(Debug, Fail)]
pub enum ConsistError {
    #[fail(display = "train definition not found: {}", _0)]
    DefinitionNotFound(String),
    #[fail(display = "malformed train definition {}: {}", _0, _1)]
    DecodeError(String, String),
    #[fail(display = "cyclic train reference: {}", _0)]
    CyclicReference(String),
    #[fail(display = "no install path for folder \"{}\" (resolving \"{}\")", _0, _1)]
    AssetPathUnresolved(String, String),
    #[fail(display = "could not read {}: {}", _0, _1)]
    Io(String, #[cause] io::Error),
}

pub fn read_file(f :&Path) -> Result<String, ConsistError> {
    std::fs::read_to_string(f).map_err(|e| ConsistError::Io(f.display().to_string(), e))
}

/// Reads a `.train-or` definition from an explicit file path.
pub fn get_train(f :&Path) -> Result<TrainDefinition, ConsistError> {
    let name = f.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| f.display().to_string());
    let contents = read_file(f)?;
    input::trainfile::parse_train(&name, &contents)
}

fn with_resolver<T, F>(root :&Path, folders :&HashMap<String, PathBuf>, f :F) -> Result<T, ConsistError>
    where F: FnOnce(&Resolver<FileLoader>) -> Result<T, ConsistError> {
    let content = Content::with_folders(root, folders.clone());
    let loader = FileLoader::new(&content);
    let resolver = Resolver::new(&content, &loader);
    f(&resolver)
}

pub fn get_forward_wagon_list(train :&TrainDefinition,
                              root :&Path,
                              folders :&HashMap<String, PathBuf>,
                              preference :Option<&PreferredLocomotive>)
    -> Result<Vec<WagonReference>, ConsistError> {
    with_resolver(root, folders, |r| r.forward_wagon_list(train, preference))
}

pub fn get_reverse_wagon_list(train :&TrainDefinition,
                              root :&Path,
                              folders :&HashMap<String, PathBuf>,
                              preference :Option<&PreferredLocomotive>)
    -> Result<Vec<WagonReference>, ConsistError> {
    with_resolver(root, folders, |r| r.reverse_wagon_list(train, preference))
}

pub fn get_lead_locomotive_choices(train :&TrainDefinition,
                                   root :&Path,
                                   folders :&HashMap<String, PathBuf>)
    -> Result<LeadLocomotiveChoices, ConsistError> {
    with_resolver(root, folders, |r| r.lead_locomotive_choices(train))
}

pub fn get_reverse_locomotive_choices(train :&TrainDefinition,
                                      root :&Path,
                                      folders :&HashMap<String, PathBuf>)
    -> Result<LeadLocomotiveChoices, ConsistError> {
    with_resolver(root, folders, |r| r.reverse_locomotive_choices(train))
}
