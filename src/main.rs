use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

use anim_catalog::{
    ArchiveDecoder, Catalog, CatalogError, CatalogNode, Category, ExportFormat, Facing,
    FolderArchive, Session, Settings, SortMode,
};

/// Command line front end for the animation catalog
#[derive(Debug, Parser)]
#[command(name = "anim-catalog", version, about)]
struct Cli {
    /// Settings file (defaults to the user data directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Animation list XML (overrides settings)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Archive root directory (overrides settings)
    #[arg(long, global = true)]
    archive: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Id,
    Name,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Bmp,
    Tiff,
    Jpg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Bmp => ExportFormat::Bmp,
            FormatArg::Tiff => ExportFormat::Tiff,
            FormatArg::Jpg => ExportFormat::Jpeg,
        }
    }
}

/// Which animation to look at
#[derive(Debug, clap::Args)]
struct Selection {
    /// Body (graphic) id
    #[arg(long)]
    body: u32,

    /// Action index
    #[arg(long, default_value_t = 0)]
    action: usize,

    /// Facing 0..=7 (defaults to settings)
    #[arg(long)]
    facing: Option<u8>,

    /// Hue override (0 = archive default)
    #[arg(long, default_value_t = 0)]
    hue: u16,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the catalog tree
    List {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Add a body to the catalog and save it
    Add {
        #[arg(long)]
        body: u32,
        /// 0:Monster, 1:Sea, 2:Animal, 3:Human, 4:Equipment
        #[arg(long = "type")]
        type_tag: i64,
        #[arg(long)]
        name: String,
    },
    /// Remove a body from the catalog and save it
    Remove {
        #[arg(long)]
        body: u32,
    },
    /// Resolve an animation and describe it
    Show {
        #[command(flatten)]
        selection: Selection,
    },
    /// Export the picture, one frame, or every frame of an animation
    Export {
        #[command(flatten)]
        selection: Selection,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Export every frame
        #[arg(long, conflicts_with = "frame")]
        all: bool,
        /// Export a single frame by index
        #[arg(long)]
        frame: Option<usize>,
        /// Output directory (overrides settings)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List archive bodies that are not in the catalog yet
    Scan,
    /// Load and save the catalog (normalizes order and comments)
    Rewrite,
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let path = match &cli.settings {
        Some(path) => path.clone(),
        None => Settings::default_path()?,
    };
    let mut settings = Settings::load(&path)?;
    if let Some(catalog) = &cli.catalog {
        settings.catalog_path = catalog.clone();
    }
    if let Some(archive) = &cli.archive {
        settings.archive_dir = archive.clone();
    }
    Ok(settings)
}

/// Load the catalog, starting empty when the file does not exist yet
fn load_catalog(settings: &Settings, archive: &dyn ArchiveDecoder) -> Result<Catalog, CatalogError> {
    match Catalog::load(&settings.catalog_path, archive) {
        Err(CatalogError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "⚠️  No animation list at {}, starting empty",
                settings.catalog_path.display()
            );
            Ok(Catalog::new())
        }
        result => result,
    }
}

fn print_tree(catalog: &Catalog) {
    for category in Category::ALL {
        println!("{}", category);
        for (_, entry) in catalog.entries(category) {
            println!("  {} ({})", entry.name, entry.id);
            for action in &entry.actions {
                println!("    {}", action);
            }
        }
    }
}

fn select(session: &mut Session<FolderArchive>, selection: &Selection, settings: &Settings) -> bool {
    let facing = selection.facing.unwrap_or(settings.facing);
    session.set_facing(Facing::new(facing));
    if selection.hue != 0 {
        session.set_hue(selection.hue - 1);
    }
    if !session.select_body(selection.body, selection.action) {
        warn!("Body {} is not in the catalog", selection.body);
        return false;
    }
    true
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(&cli)?;
    let archive = FolderArchive::open(&settings.archive_dir)?;
    let mut catalog = load_catalog(&settings, &archive)?;
    if settings.sort_by_name {
        catalog.set_sort_mode(SortMode::ByName);
    }
    let mut session = Session::new(catalog, archive);

    match cli.command {
        Command::List { sort } => {
            match sort {
                Some(SortArg::Id) => session.set_sort_mode(SortMode::ById),
                Some(SortArg::Name) => session.set_sort_mode(SortMode::ByName),
                None => {}
            }
            print_tree(session.catalog());
        }
        Command::Add { body, type_tag, name } => {
            session.add_entry(body, type_tag, &name)?;
            session.save_catalog(&settings.catalog_path)?;
        }
        Command::Remove { body } => {
            let handle = session
                .catalog()
                .find(body)
                .ok_or_else(|| format!("body {} is not in the catalog", body))?;
            session.remove(CatalogNode::Entry(handle));
            session.save_catalog(&settings.catalog_path)?;
        }
        Command::Show { selection } => {
            if select(&mut session, &selection, &settings) {
                match session.info() {
                    Some(info) => {
                        println!("BaseGraphic: {}", info.base_body);
                        println!("Graphic: {}(0x{:X})", info.body, info.body);
                        println!("Hue: {}", u32::from(info.hue) + 1);
                        println!("Frames: {}", info.frame_count);
                        if let Some(file) = session.decoder().file_name_for(info.body) {
                            println!("File: {}", file);
                        }
                    }
                    None => println!("No frames for action {}", selection.action),
                }
            }
        }
        Command::Export { selection, format, all, frame, out } => {
            if !select(&mut session, &selection, &settings) {
                return Ok(());
            }
            let format = format.map(ExportFormat::from).unwrap_or(settings.export_format);
            let out_dir = out.unwrap_or_else(|| settings.output_dir.clone());

            let written = if all || frame.is_some() {
                session.set_animate(true);
                match frame {
                    Some(index) => session.export_frame(index, format, &out_dir)?,
                    None => session.export_animation(format, &out_dir)?,
                }
            } else {
                session.export_picture(format, &out_dir)?
            };
            for path in written {
                println!("{}", path.display());
            }
        }
        Command::Scan => {
            for body in session.undefined_bodies() {
                println!("{}", body);
            }
        }
        Command::Rewrite => {
            session.save_catalog(&settings.catalog_path)?;
            info!("XML saved");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
