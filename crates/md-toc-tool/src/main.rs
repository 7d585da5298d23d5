use argh::FromArgs;
use colored::Colorize;
use std::path::{Path, PathBuf};

use md_toc_tool::{
    budget, compile, delete_tracks, describe_groups, group_tracks, load_config, move_track,
    sanitize, save_config, Config, Error,
};

#[derive(Debug, FromArgs)]
#[argh(
    description = "Edits MiniDisc titles described by a disc.toml file that follows this format\n\t[disc]\n\ttitle = \"My Disc\"\n\n\t[[tracks]]\n\ttitle = \"Intro\"\t\t\t# encoding = \"SP\" | \"LP2\" | \"LP4\"\n\n\t[[groups]]\n\ttitle = \"Side A\"\n\ttracks = [1, 3]\t\t\t# first and last track number\n"
)]
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Compile(CompileArgs),
    Budget(BudgetArgs),
    Groups(GroupsArgs),
    Sanitize(SanitizeArgs),
    Delete(DeleteArgs),
    Move(MoveArgs),
    Group(GroupArgs),
}

#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "compile", description = "print the raw disc title strings")]
struct CompileArgs {
    /// disc description
    #[argh(positional)]
    disc: PathBuf,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "budget", description = "print the bytes left in the title table")]
struct BudgetArgs {
    /// disc description
    #[argh(positional)]
    disc: PathBuf,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "groups", description = "list groups in track order")]
struct GroupsArgs {
    /// disc description
    #[argh(positional)]
    disc: PathBuf,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "sanitize", description = "print a title as the device would store it")]
struct SanitizeArgs {
    /// title to sanitize
    #[argh(positional)]
    text: String,
    /// sanitize for the full-width slot
    #[argh(switch)]
    full_width: bool,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "delete", description = "delete tracks and shift the groups")]
struct DeleteArgs {
    /// disc description
    #[argh(positional)]
    disc: PathBuf,
    /// track numbers, starting at 1
    #[argh(positional)]
    tracks: Vec<usize>,
    /// output path, defaults to the input file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "move", description = "move a track and shift the groups")]
struct MoveArgs {
    /// disc description
    #[argh(positional)]
    disc: PathBuf,
    /// track number to move
    #[argh(positional)]
    from: usize,
    /// new track number
    #[argh(positional)]
    to: usize,
    /// output path, defaults to the input file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "group", description = "group consecutive tracks under a title")]
struct GroupArgs {
    /// disc description
    #[argh(positional)]
    disc: PathBuf,
    /// track numbers, starting at 1
    #[argh(positional)]
    tracks: Vec<usize>,
    /// group title
    #[argh(option)]
    title: String,
    /// output path, defaults to the input file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Error> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Args = argh::from_env();
    match args.command {
        Command::Compile(args) => {
            let disc = load_config(&args.disc)?.to_disc()?;
            let raw = compile(&disc)?;
            println!("{}", raw.half_width);
            if raw.full_width.is_empty() {
                eprintln!("{}", "No full-width titles".dimmed());
            } else {
                println!("{}", raw.full_width);
            }
        }
        Command::Budget(args) => {
            let disc = load_config(&args.disc)?.to_disc()?;
            let budget = budget(&disc);
            println!("{} bytes free", budget.without_groups.to_string().green());
            println!(
                "{} bytes free counting group titles",
                budget.with_groups.to_string().green()
            );
        }
        Command::Groups(args) => {
            let disc = load_config(&args.disc)?.to_disc()?;
            for line in describe_groups(&disc) {
                println!("{line}");
            }
        }
        Command::Sanitize(args) => {
            println!("{}", sanitize(&args.text, args.full_width));
        }
        Command::Delete(args) => {
            let disc = load_config(&args.disc)?.to_disc()?;
            let edited = delete_tracks(&disc, &args.tracks)?;
            write(&args.disc, args.output, &Config::from_disc(&edited))?;
        }
        Command::Move(args) => {
            let disc = load_config(&args.disc)?.to_disc()?;
            let edited = move_track(&disc, args.from, args.to)?;
            write(&args.disc, args.output, &Config::from_disc(&edited))?;
        }
        Command::Group(args) => {
            let disc = load_config(&args.disc)?.to_disc()?;
            let edited = group_tracks(&disc, &args.tracks, &args.title)?;
            write(&args.disc, args.output, &Config::from_disc(&edited))?;
        }
    }

    Ok(())
}

fn write(input: &Path, output: Option<PathBuf>, config: &Config) -> Result<(), Error> {
    let output = output.unwrap_or_else(|| input.to_path_buf());
    save_config(&output, config)?;
    println!("Wrote {}! {}", output.display().to_string().green(), "".clear());
    Ok(())
}
