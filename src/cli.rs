use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vrc-archiver",
    about = "Archival compression tool for VRChat screenshot folders",
    long_about = "vrc-archiver packs VRChat screenshot folders into compressed archives. \
                  Images are re-encoded losslessly to JPEG XL (with verbatim-copy fallback), \
                  a JSON manifest is embedded in every archive, and monthly folders can be \
                  discovered and archived in bulk. Embedded VRChat metadata (world id, world \
                  name, friends) in PNG tEXt chunks is preserved and editable.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    vrc-archiver archive ./Pictures/VRChat/2024-03 ./archives -f 7z\n  \
    vrc-archiver archive-monthly ./Pictures/VRChat ./archives\n  \
    vrc-archiver folders ./Pictures/VRChat\n  \
    vrc-archiver export export.zip --index index.json --ids 12,34,56\n  \
    vrc-archiver convert shot.png shot.jxl --lossless\n  \
    vrc-archiver meta read shot.png"
)]
pub struct Args {
    #[arg(short = 'q', long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Archive one screenshot folder into a compressed container",
        long_about = "Scan a folder recursively, re-encode every image to lossless JPEG XL \
                      (falling back to a verbatim copy on conversion failure), write a JSON \
                      manifest, and pack everything into a single 7z or zip archive named \
                      after the source folder."
    )]
    Archive {
        #[arg(help = "Source folder to archive")]
        source: PathBuf,

        #[arg(help = "Directory the archive is written into")]
        output: PathBuf,

        #[arg(
            short = 'f',
            long,
            default_value = "7z",
            help = "Archive format (7z, zip)"
        )]
        format: String,

        #[arg(short = 'j', long, help = "Number of parallel threads (default: auto)")]
        threads: Option<usize>,
    },

    #[command(
        about = "Archive every monthly (YYYY-MM) folder under a base directory",
        long_about = "Discover folders named YYYY-MM directly under the base directory and \
                      archive each into its own container. Folders are processed in parallel \
                      and isolated from one another; a failing folder is reported without \
                      affecting its siblings. The current month is skipped unless requested."
    )]
    ArchiveMonthly {
        #[arg(help = "Base directory containing YYYY-MM folders")]
        base: PathBuf,

        #[arg(help = "Directory the archives are written into")]
        output: PathBuf,

        #[arg(
            short = 'f',
            long,
            default_value = "7z",
            help = "Archive format (7z, zip)"
        )]
        format: String,

        #[arg(long, help = "Also archive the current month's folder")]
        include_current: bool,

        #[arg(short = 'j', long, help = "Number of parallel threads (default: auto)")]
        threads: Option<usize>,
    },

    #[command(
        about = "List monthly (YYYY-MM) folders eligible for archival",
        long_about = "Enumerate folders named YYYY-MM directly under the base directory with \
                      their recursive file counts and sizes, most recent first, as JSON."
    )]
    Folders {
        #[arg(help = "Base directory containing YYYY-MM folders")]
        base: PathBuf,

        #[arg(long, help = "Include the current month's folder")]
        include_current: bool,
    },

    #[command(
        about = "Export selected images by id into a downloadable archive",
        long_about = "Resolve image ids through a JSON index file ({\"id\": \"path\", ...}), \
                      copy the resolved files into a staging area, and pack them into an \
                      archive. Missing ids are reported and skipped; an export that resolves \
                      zero files fails without creating anything."
    )]
    Export {
        #[arg(help = "Output archive path")]
        output: PathBuf,

        #[arg(long, help = "JSON index file mapping image ids to file paths")]
        index: PathBuf,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Comma-separated image ids to export"
        )]
        ids: Vec<i64>,

        #[arg(
            short = 'f',
            long,
            default_value = "zip",
            help = "Archive format (7z, zip)"
        )]
        format: String,
    },

    #[command(
        about = "Convert a single image between formats",
        long_about = "Re-encode one image to jpg, png, webp, avif, or jxl. Quality applies to \
                      lossy targets; --lossless forces a lossless encode where the codec \
                      supports it. The target format is taken from --format or the output \
                      file extension."
    )]
    Convert {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Output image file path")]
        output: PathBuf,

        #[arg(short = 'f', long, help = "Target format (jpg, png, webp, avif, jxl)")]
        format: Option<String>,

        #[arg(short = 'Q', long, help = "Encode quality (1-100, default: 100)")]
        quality: Option<u8>,

        #[arg(long, help = "Force a lossless encode where supported")]
        lossless: bool,
    },

    #[command(
        about = "Read or write embedded VRChat metadata in a PNG",
        long_about = "Inspect or edit the vrc_world_id, vrc_world_name, and vrc_friends keys \
                      stored in a PNG's tEXt chunks. Writing re-encodes the file in place."
    )]
    Meta {
        #[command(subcommand)]
        command: MetaCommands,
    },
}

#[derive(Subcommand)]
pub enum MetaCommands {
    #[command(about = "Print embedded VRChat metadata as JSON")]
    Read {
        #[arg(help = "PNG file to inspect")]
        file: PathBuf,
    },

    #[command(about = "Write VRChat metadata keys into a PNG's tEXt chunks")]
    Write {
        #[arg(help = "PNG file to modify in place")]
        file: PathBuf,

        #[arg(long, help = "World id (vrc_world_id)")]
        world_id: Option<String>,

        #[arg(long, help = "World name (vrc_world_name)")]
        world_name: Option<String>,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Comma-separated friend names (vrc_friends)"
        )]
        friends: Vec<String>,
    },
}
