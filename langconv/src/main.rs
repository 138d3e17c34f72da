use clap::{Parser, Subcommand};
use josm_i18n::Endianness;
use langconv::{ConversionMode, ConvertOptions, ShortenConfig, run_conversion, shorten_po_files};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(clap::Args, Debug)]
struct ConversionArgs {
    /// A directory containing the files to convert (not in subdirectories), or a single file
    input: PathBuf,

    /// The directory to write into, defaults to the input directory or the directory of the input file
    output: Option<PathBuf>,

    /// The language of the message ids
    #[arg(long, default_value = "en")]
    base_language: String,

    /// Write big endian *.mo files instead of little endian ones
    #[arg(long)]
    big_endian: bool,

    /// Print the translation statistics as JSON
    #[arg(long)]
    json: bool,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert *.mo files (selected by their magic number) to *.lang files.
    #[command(name = "mo2lang")]
    Mo2Lang(ConversionArgs),

    /// Convert *.lang files to *.mo files, the file of the base language is required.
    #[command(name = "lang2mo")]
    Lang2Mo(ConversionArgs),

    /// Convert *.po files to *.mo files.
    #[command(name = "po2mo")]
    Po2Mo(ConversionArgs),

    /// Convert *.mo files (selected by their magic number) to *.po files.
    #[command(name = "mo2po")]
    Mo2Po(ConversionArgs),

    /// Convert *.po files to *.lang files.
    #[command(name = "po2lang")]
    Po2Lang(ConversionArgs),

    /// Remove source references and e-mail addresses from *.po files and fill out their header.
    ShortenPo {
        /// A *.po file or a directory containing *.po files
        input: PathBuf,

        /// The directory to write into, the files are rewritten in place if omitted
        output: Option<PathBuf>,

        /// The name of the translated package
        #[arg(long)]
        package_name: String,

        /// The title in the header comment, defaults to one naming the package and the language
        #[arg(long)]
        title: Option<String>,

        /// The copyright holder in the header comment
        #[arg(long, default_value = "")]
        copyright_holder: String,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("langconv=info,josm_i18n=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn convert(mode: ConversionMode, args: ConversionArgs) -> Result<(), String> {
    let options = ConvertOptions {
        base_language: args.base_language,
        endianness: Endianness::from_big_endian(args.big_endian),
        json_stats: args.json,
    };
    run_conversion(mode, &args.input, args.output.as_deref(), &options).map(|_| ())
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let result = match args.commands {
        Commands::Mo2Lang(args) => convert(ConversionMode::Mo2Lang, args),
        Commands::Lang2Mo(args) => convert(ConversionMode::Lang2Mo, args),
        Commands::Po2Mo(args) => convert(ConversionMode::Po2Mo, args),
        Commands::Mo2Po(args) => convert(ConversionMode::Mo2Po, args),
        Commands::Po2Lang(args) => convert(ConversionMode::Po2Lang, args),
        Commands::ShortenPo {
            input,
            output,
            package_name,
            title,
            copyright_holder,
        } => {
            let config = ShortenConfig {
                package_name,
                title,
                copyright_holder,
            };
            shorten_po_files(&input, output.as_deref(), &config).map(|_| ())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
