//! protoc-gen-go-hz
//!
//! protoc plugin that generates CloudWeGo Hertz route bindings for proto
//! services. Run without a subcommand it speaks the plugin protocol on
//! stdin/stdout; `inspect` and `generate` work offline on a
//! FileDescriptorSet.

mod logging;
mod plugin;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use protoc_gen_go_hz_common::HttpBinding;
use protoc_gen_go_hz_generator::HertzGenerator;
use protoc_gen_go_hz_parser::{ParsedModel, ProtobufParser};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "protoc-gen-go-hz")]
#[command(version, about = "Generate Hertz HTTP bindings for Protocol Buffer services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route model of a FileDescriptorSet as JSON
    #[command(after_help = "EXAMPLES:\n  \
        # Build a descriptor set and inspect every service in it\n  \
        protoc --include_imports --descriptor_set_out=api.pb -I proto user/v1/user.proto\n  \
        protoc-gen-go-hz inspect --descriptor-set api.pb\n\n  \
        # Inspect one file with plugin options\n  \
        protoc-gen-go-hz inspect --descriptor-set api.pb \\\n    \
        --file user/v1/user.proto \\\n    \
        --param paths=source_relative")]
    Inspect {
        #[command(flatten)]
        input: DescriptorArgs,
    },

    /// Generate Go files from a FileDescriptorSet
    #[command(after_help = "EXAMPLES:\n  \
        # Generate next to the proto sources\n  \
        protoc-gen-go-hz generate \\\n    \
        --descriptor-set api.pb \\\n    \
        --param paths=source_relative \\\n    \
        --output ./gen\n\n  \
        # One file per Go package\n  \
        protoc-gen-go-hz generate \\\n    \
        --descriptor-set api.pb \\\n    \
        --param layout=package \\\n    \
        --output ./gen")]
    Generate {
        #[command(flatten)]
        input: DescriptorArgs,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct DescriptorArgs {
    /// FileDescriptorSet written by `protoc --descriptor_set_out`
    #[arg(short, long)]
    descriptor_set: PathBuf,

    /// Proto file to generate (repeatable; defaults to every file with a service)
    #[arg(short, long = "file")]
    files: Vec<String>,

    /// Plugin parameter string, as passed with --go-hz_opt
    #[arg(short, long, default_value = "")]
    param: String,
}

impl DescriptorArgs {
    fn load(&self, verbose: bool) -> Result<ParsedModel> {
        let parser = ProtobufParser::from_file(&self.descriptor_set, &self.files, &self.param)
            .context("Failed to load FileDescriptorSet")?;
        logging::init(verbose || parser.options().verbose);

        parser.parse().context("Failed to build route model")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => plugin::run(cli.verbose)?,
        Some(Commands::Inspect { input }) => inspect_command(&input, cli.verbose)?,
        Some(Commands::Generate { input, output }) => {
            generate_command(&input, output.as_path(), cli.verbose)?
        }
    }

    Ok(())
}

fn inspect_command(input: &DescriptorArgs, verbose: bool) -> Result<()> {
    let model = input.load(verbose)?;
    let json = serde_json::to_string_pretty(&model).context("Failed to serialize route model")?;
    println!("{}", json);
    Ok(())
}

fn generate_command(input: &DescriptorArgs, output: &Path, verbose: bool) -> Result<()> {
    eprintln!(
        "{} Loading descriptor set: {}",
        "→".cyan(),
        input.descriptor_set.display()
    );
    let model = input.load(verbose)?;

    let routes: usize = model.tables.iter().map(|t| t.routes.len()).sum();
    eprintln!(
        "{} Resolved {} routes in {} services",
        "✓".green(),
        routes,
        model.tables.len()
    );

    if verbose {
        for table in &model.tables {
            eprintln!("  • {}", table.service.cyan());
            for route in &table.routes {
                eprintln!(
                    "    {} {} → {}",
                    route.verb().as_str().yellow(),
                    route.binding.template.hertz_path(),
                    route.method
                );
                print_params(&route.binding);
            }
        }
    }

    eprintln!("{} Generating Go files...", "→".cyan());
    let written = HertzGenerator::new(&model.index, &model.tables, &model.options)
        .generate_to_directory(output)
        .context("Failed to generate bindings")?;

    if written.is_empty() {
        eprintln!("\n{}", "No HTTP annotations found, nothing generated".yellow());
        return Ok(());
    }

    eprintln!("\n{}", "✓ Generation complete!".green().bold());
    eprintln!("\n{}", "Generated files:".bold());
    for path in &written {
        eprintln!("  📄 {}", path.display());
    }

    Ok(())
}

fn print_params(binding: &HttpBinding) {
    for param in &binding.params {
        eprintln!(
            "      {} {} ← {}",
            param.source.to_string().dimmed(),
            param.name,
            param.field.name
        );
    }
}
