use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

mod config;
mod error;
mod generator;
mod models;
mod normalize;
mod suggest;
mod template;

use generator::{GenerationRequest, TargetCount};
use models::{ExportDocument, Person};

#[derive(Parser)]
#[command(author, version, about = "Generates deduplicated email account records from names and username templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate account records from username templates
    Generate {
        #[command(flatten)]
        args: config::GenerateArgs,
    },
    /// Print randomly sampled username templates
    Suggest {
        /// Number of templates to print
        #[arg(short, long, default_value_t = 10)]
        count: usize,

        /// Seed for reproducible sampling
        #[arg(long, env = "MAILFORGE_SEED")]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => run_generate(&args),
        Commands::Suggest { count, seed } => run_suggest(count, seed),
    }
}

fn run_generate(args: &config::GenerateArgs) -> Result<()> {
    let settings = config::build_settings(args)?;

    let domain = settings.domain.clone().unwrap_or_default();
    let target = settings
        .target_count
        .map(TargetCount::Explicit)
        .unwrap_or(TargetCount::FromTemplates);

    let (mut request, primary) = if let Some(input) = &args.input {
        let mut persons = models::read_persons(input)?;
        if !settings.password.is_empty() {
            for person in &mut persons {
                if person.password.is_empty() {
                    person.password = settings.password.clone();
                }
            }
        }
        let primary = persons.first().cloned().unwrap_or_default();
        let request =
            GenerationRequest::multi_user(persons, &domain, settings.templates.clone(), target);
        (request, primary)
    } else {
        let person = Person::new(
            args.first.as_deref().unwrap_or(""),
            args.last.as_deref().unwrap_or(""),
            &settings.password,
        );
        let request = GenerationRequest::single_user(
            Some(person.clone()),
            &domain,
            settings.templates.clone(),
            target,
        );
        (request, person)
    };
    request.main_template = settings.main_template.clone();
    request.allow_duplicate_templates = settings.allow_duplicate_templates;

    let set = generator::generate(&request)?;

    info!(
        "Generated {} shared record(s){}",
        set.shared.len(),
        if set.main.is_some() {
            " plus a main record"
        } else {
            ""
        }
    );

    let document = ExportDocument::new(&primary, &domain.trim().to_lowercase(), set);
    let json = if settings.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };

    match &settings.output_file {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            info!(
                "Wrote {} record(s) to {}",
                document.sharedmailbox.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn run_suggest(count: usize, seed: Option<u64>) -> Result<()> {
    let mut rng: StdRng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for template in suggest::sample_templates(count, &mut rng) {
        println!("{}", template);
    }

    Ok(())
}
