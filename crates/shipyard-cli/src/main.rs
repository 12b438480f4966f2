use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shipyard_cli::output::OutputFormat;
use shipyard_lib::{FiringArc, GunConfiguration, MountType, ProgressLevel, ShipClass, TechTrack};

mod commands;

use commands::catalog::{handle_catalog, CatalogFilter, CatalogKind};
use commands::design::{
    handle_check, handle_constraints, handle_new, handle_remove, handle_summary, NewDesign,
};
use commands::install::{self, TankFor, Target, WeaponRequest};
use commands::ordnance::{self, CategoryArg, DesignRequest};
use commands::Session;

#[derive(Parser, Debug)]
#[command(author, version, about = "Alternity starship design calculator")]
struct Cli {
    /// Equipment catalog file. Defaults to $SHIPYARD_CATALOG, then the user
    /// data directory, then the built-in catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

/// A comma-separated list of single-letter tech tracks, e.g. `G,X`.
#[derive(Debug, Clone)]
struct TrackList(Vec<TechTrack>);

fn parse_tracks(value: &str) -> Result<TrackList, String> {
    TechTrack::parse_list(value)
        .map(TrackList)
        .map_err(|err| err.to_string())
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog equipment of one kind.
    Catalog {
        #[arg(value_enum)]
        kind: CatalogKind,
        /// Only entries available at this progress level.
        #[arg(long = "pl")]
        progress_level: Option<ProgressLevel>,
        /// Tech tracks available alongside --pl.
        #[arg(long, value_parser = parse_tracks)]
        tracks: Option<TrackList>,
        /// Only entries installable on this ship class.
        #[arg(long = "class")]
        ship_class: Option<ShipClass>,
    },
    /// Create an empty design on a hull.
    New {
        path: PathBuf,
        #[arg(long)]
        name: String,
        /// Hull id or name.
        #[arg(long)]
        hull: String,
        #[arg(long = "pl", default_value_t = 6)]
        progress_level: ProgressLevel,
        #[arg(long, value_parser = parse_tracks)]
        tracks: Option<TrackList>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print hull point, power, cost and subsystem totals.
    Summary { path: PathBuf },
    /// Validate the whole design; exits non-zero on blocking errors.
    Check { path: PathBuf },
    /// Install equipment, or replace an installation with --edit.
    Install {
        path: PathBuf,
        /// Installation id to replace.
        #[arg(long, global = true)]
        edit: Option<String>,
        #[command(subcommand)]
        item: InstallCommand,
    },
    /// Remove an installation by id.
    Remove { path: PathBuf, id: String },
    /// Change the design's progress level or tech tracks.
    Constraints {
        path: PathBuf,
        #[arg(long = "pl")]
        progress_level: Option<ProgressLevel>,
        #[arg(long, value_parser = parse_tracks)]
        tracks: Option<TrackList>,
    },
    /// Manage ordnance designs and launcher loadouts.
    Ordnance {
        path: PathBuf,
        #[command(subcommand)]
        action: OrdnanceCommand,
    },
}

#[derive(Args, Debug)]
struct SizedArgs {
    /// Catalog id or name.
    kind: String,
    /// Hull points allocated.
    #[arg(long = "hp")]
    hull_points: u32,
}

#[derive(Args, Debug)]
struct CountedArgs {
    /// Catalog id or name.
    kind: String,
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Subcommand, Debug)]
enum InstallCommand {
    Engine(SizedArgs),
    PowerPlant(SizedArgs),
    /// Fuel for an engine or power plant type.
    FuelTank {
        #[arg(long, conflicts_with = "power_plant", required_unless_present = "power_plant")]
        engine: Option<String>,
        #[arg(long)]
        power_plant: Option<String>,
        #[arg(long = "hp")]
        hull_points: u32,
    },
    Sensor {
        kind: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long = "extra-hp", default_value_t = 0)]
        extra_hull_points: u32,
        /// Covered arc; repeat for several.
        #[arg(long = "arc")]
        arcs: Vec<FiringArc>,
    },
    Weapon {
        kind: String,
        #[arg(long, default_value = "standard")]
        mount: MountType,
        #[arg(long, default_value = "single")]
        guns: GunConfiguration,
        #[arg(long)]
        concealed: bool,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        /// Firing arc; repeat for several.
        #[arg(long = "arc")]
        arcs: Vec<FiringArc>,
    },
    Launcher {
        kind: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long = "extra-hp", default_value_t = 0)]
        extra_hull_points: u32,
    },
    LifeSupport(CountedArgs),
    Accommodation(CountedArgs),
    Store(CountedArgs),
    Gravity {
        kind: String,
    },
}

#[derive(Subcommand, Debug)]
enum OrdnanceCommand {
    /// Compose a new ordnance design.
    Design {
        #[arg(value_enum)]
        category: CategoryArg,
        #[arg(long)]
        name: String,
        /// Propulsion (or casing) id or name.
        #[arg(long)]
        propulsion: String,
        #[arg(long)]
        warhead: String,
        #[arg(long)]
        guidance: Option<String>,
    },
    /// Load rounds into a launcher.
    Load {
        launcher: String,
        /// Ordnance design id or name.
        design: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Unload rounds; without --quantity the whole line is removed.
    Unload {
        launcher: String,
        design: String,
        #[arg(long)]
        quantity: Option<u32>,
    },
    /// Delete a design that no launcher carries.
    Delete { design: String },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let session = Session::open(cli.catalog.as_deref(), cli.format)?;

    match cli.command {
        Command::Catalog {
            kind,
            progress_level,
            tracks,
            ship_class,
        } => {
            let filter = CatalogFilter {
                progress_level,
                tech_tracks: tracks.map(|t| t.0).unwrap_or_default(),
                ship_class,
            };
            handle_catalog(&session, kind, &filter)
        }
        Command::New {
            path,
            name,
            hull,
            progress_level,
            tracks,
            force,
        } => handle_new(
            &session,
            &path,
            NewDesign {
                name: &name,
                hull: &hull,
                progress_level,
                tech_tracks: tracks.map(|t| t.0).unwrap_or_default(),
                force,
            },
        ),
        Command::Summary { path } => handle_summary(&session, &path),
        Command::Check { path } => handle_check(&session, &path),
        Command::Install { path, edit, item } => {
            let target = Target {
                path: &path,
                edit: edit.as_deref(),
            };
            dispatch_install(&session, target, item)
        }
        Command::Remove { path, id } => handle_remove(&session, &path, &id),
        Command::Constraints {
            path,
            progress_level,
            tracks,
        } => handle_constraints(&session, &path, progress_level, tracks.map(|t| t.0)),
        Command::Ordnance { path, action } => dispatch_ordnance(&session, &path, action),
    }
}

fn dispatch_install(session: &Session, target: Target<'_>, item: InstallCommand) -> Result<()> {
    match item {
        InstallCommand::Engine(SizedArgs { kind, hull_points }) => {
            install::handle_engine(session, target, &kind, hull_points)
        }
        InstallCommand::PowerPlant(SizedArgs { kind, hull_points }) => {
            install::handle_power_plant(session, target, &kind, hull_points)
        }
        InstallCommand::FuelTank {
            engine,
            power_plant,
            hull_points,
        } => {
            let feeds = match (&engine, &power_plant) {
                (Some(key), _) => TankFor::Engine(key),
                (None, Some(key)) => TankFor::PowerPlant(key),
                (None, None) => anyhow::bail!("a fuel tank needs --engine or --power-plant"),
            };
            install::handle_fuel_tank(session, target, feeds, hull_points)
        }
        InstallCommand::Sensor {
            kind,
            quantity,
            extra_hull_points,
            arcs,
        } => install::handle_sensor(session, target, &kind, quantity, extra_hull_points, arcs),
        InstallCommand::Weapon {
            kind,
            mount,
            guns,
            concealed,
            quantity,
            arcs,
        } => install::handle_weapon(
            session,
            target,
            WeaponRequest {
                type_key: &kind,
                mount,
                guns,
                concealed,
                quantity,
                arcs,
            },
        ),
        InstallCommand::Launcher {
            kind,
            quantity,
            extra_hull_points,
        } => install::handle_launcher(session, target, &kind, quantity, extra_hull_points),
        InstallCommand::LifeSupport(CountedArgs { kind, quantity }) => {
            install::handle_life_support(session, target, &kind, quantity)
        }
        InstallCommand::Accommodation(CountedArgs { kind, quantity }) => {
            install::handle_accommodation(session, target, &kind, quantity)
        }
        InstallCommand::Store(CountedArgs { kind, quantity }) => {
            install::handle_store(session, target, &kind, quantity)
        }
        InstallCommand::Gravity { kind } => install::handle_gravity(session, target, &kind),
    }
}

fn dispatch_ordnance(session: &Session, path: &Path, action: OrdnanceCommand) -> Result<()> {
    match action {
        OrdnanceCommand::Design {
            category,
            name,
            propulsion,
            warhead,
            guidance,
        } => ordnance::handle_design(
            session,
            path,
            DesignRequest {
                category,
                name: &name,
                propulsion: &propulsion,
                warhead: &warhead,
                guidance: guidance.as_deref(),
            },
        ),
        OrdnanceCommand::Load {
            launcher,
            design,
            quantity,
        } => ordnance::handle_load(session, path, &launcher, &design, quantity),
        OrdnanceCommand::Unload {
            launcher,
            design,
            quantity,
        } => ordnance::handle_unload(session, path, &launcher, &design, quantity),
        OrdnanceCommand::Delete { design } => ordnance::handle_delete(session, path, &design),
    }
}

/// Logs go to stderr so `--format json` output stays parseable.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
