extern crate consist;
extern crate failure;
extern crate structopt;
extern crate env_logger;
#[macro_use] extern crate log;

use consist::*;
use consist::formation::{Direction, PreferredLocomotive, Resolver};
use consist::input::content::{AssetKind, Content, FileLoader};
use std::collections::HashMap;
use std::path::PathBuf;
use structopt::StructOpt;

/// Consist -- resolve a train definition into its rolling stock
#[derive(StructOpt, Debug)]
#[structopt(name="consist")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,

    /// Train definition file (.train-or)
    #[structopt(parse(from_os_str))]
    train: PathBuf,

    /// Content root; defaults to the tree the train file is stored in, or the current directory
    #[structopt(short = "r", long = "root", parse(from_os_str))]
    root: Option<PathBuf>,

    /// Additional install folder, as NAME=PATH (repeatable)
    #[structopt(short = "f", long = "folder", parse(try_from_str = parse_folder))]
    folders: Vec<(String, PathBuf)>,

    /// Resolve the train read back to front
    #[structopt(short = "R", long = "reverse")]
    reverse: bool,

    /// Preferred lead locomotive, as an engine name resolved like list entries (e.g. "acela/acela" or "MSTS:dash9"), not a file path
    #[structopt(short = "p", long = "prefer", value_name = "ENGINE")]
    prefer: Option<String>,

    /// Output JSON consist file
    #[structopt(short = "j", long = "json", parse(from_os_str))]
    json: Option<PathBuf>,
}

fn parse_folder(s :&str) -> Result<(String, PathBuf), String> {
    match s.find('=') {
        Some(i) if i > 0 => Ok((s[..i].to_string(), PathBuf::from(&s[i + 1..]))),
        _ => Err(format!("expected NAME=PATH, got \"{}\"", s)),
    }
}

fn init_logging(verbose :u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(opt :&Opt) -> AppResult<()> {
    let train = get_train(&opt.train)?;
    info!("loaded {:?} ({} items)", train.display_name, train.items.len());

    let root = opt.root.clone()
        .or_else(|| Content::infer_root(&opt.train))
        .unwrap_or_else(|| PathBuf::from("."));
    let folders :HashMap<String, PathBuf> = opt.folders.iter().cloned().collect();
    let content = Content::with_folders(root, folders);
    let loader = FileLoader::new(&content);
    let resolver = Resolver::new(&content, &loader);

    let direction = if opt.reverse { Direction::Reverse } else { Direction::Forward };
    let preference = match opt.prefer {
        Some(ref name) => Some(PreferredLocomotive::new(content.resolve_asset_path(AssetKind::Engine, name)?)),
        None => None,
    };

    let choices = resolver.lead_choices(&train, direction)?;
    let wagons = resolver.wagon_list(&train, direction, preference.as_ref())?;

    println!("# Train \"{}\" ({:?}):", train.display_name, direction);
    println!("## Lead locomotive:");
    print!("{}", output::text::lead_choices(&choices));
    println!("## Wagons:");
    match preference {
        Some(ref p) if wagons.is_empty() =>
            println!("  preferred locomotive {} cannot lead this train", p.path.display()),
        _ => print!("{}", output::text::wagon_list(&wagons)),
    }

    if let Some(ref json) = opt.json {
        use std::fs::File;
        use std::io::BufWriter;
        let file = File::create(json)?;
        let mut writer = BufWriter::new(&file);
        let name = opt.train.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        output::json::json_consist(&name, direction, &choices, &wagons, &mut writer)?;
    }

    Ok(())
}

pub fn main() {
    let opt = Opt::from_args();
    init_logging(opt.verbose);
    debug!("{:?}", opt);
    match run(&opt) {
        Ok(()) => {},
        Err(e) => {
            println!("Error:");
            for cause in e.iter_chain() {
                println!("  {}", cause);
            }
            std::process::exit(1);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_option() {
        assert_eq!(parse_folder("MSTS=/opt/msts"), Ok(("MSTS".to_string(), PathBuf::from("/opt/msts"))));
        assert_eq!(parse_folder("A=b=c"), Ok(("A".to_string(), PathBuf::from("b=c"))));
        assert!(parse_folder("MSTS").is_err());
        assert!(parse_folder("=/opt/msts").is_err());
    }

    #[test]
    fn prefer_option() {
        let opt = Opt::from_iter(&["consist", "x.train-or", "-p", "MSTS:dash9", "-f", "MSTS=/m", "-R"]);
        assert_eq!(opt.prefer.as_deref(), Some("MSTS:dash9"));
        assert_eq!(opt.folders, vec![("MSTS".to_string(), PathBuf::from("/m"))]);
        assert!(opt.reverse);
    }
}
