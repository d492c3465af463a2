//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Slug-derived URL path sync for content records
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "slugtree.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compose the primary path of one entry
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Run an editing session over one entry and print its path list
    #[command(visible_alias = "e")]
    Edit {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        args: EditArgs,
    },
}

/// Entry selection shared by all subcommands.
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    /// Record store JSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub store: PathBuf,

    /// Entry id
    #[arg(short, long)]
    pub entry: String,
}

/// Edit command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct EditArgs {
    /// Field holding the path list
    #[arg(short, long, default_value = "urlPaths")]
    pub field: String,

    /// New slug value (empty string clears it)
    #[arg(long)]
    pub slug: Option<String>,

    /// Re-point the parent reference
    #[arg(long, conflicts_with = "clear_parent")]
    pub parent: Option<String>,

    /// Clear the parent reference
    #[arg(long)]
    pub clear_parent: bool,

    /// Alias to append (repeatable)
    #[arg(short, long = "alias", value_name = "PATH")]
    pub aliases: Vec<String>,

    /// Alias to remove (repeatable)
    #[arg(short, long = "remove", value_name = "PATH")]
    pub removals: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        let cli = Cli::try_parse_from([
            "slugtree", "edit", "--store", "s.json", "--entry", "R", "--slug", "gadget",
            "--alias", "/a", "--alias", "/b", "--remove", "/c",
        ])
        .unwrap();

        let Commands::Edit { target, args } = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(target.entry, "R");
        assert_eq!(args.field, "urlPaths");
        assert_eq!(args.slug.as_deref(), Some("gadget"));
        assert_eq!(args.aliases, ["/a", "/b"]);
        assert_eq!(args.removals, ["/c"]);
        assert_eq!(cli.config, PathBuf::from("slugtree.toml"));
    }

    #[test]
    fn test_parent_conflicts_with_clear() {
        let result = Cli::try_parse_from([
            "slugtree", "edit", "-s", "s.json", "-e", "R", "--parent", "P", "--clear-parent",
        ]);
        assert!(result.is_err());
    }
}
