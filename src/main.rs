use clap::Parser;
use study_assistant_client::cli::commands::{
    cmd_explain, cmd_guide, cmd_questions, cmd_summarize, cmd_workflows,
};
use study_assistant_client::cli::config::{Cli, Commands, init_tracing, load_config, resolve_settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());

    // Resolve server settings: CLI > config > defaults
    let settings = resolve_settings(cli.base_url.as_deref(), &config);

    let succeeded = match cli.command {
        Commands::Guide {
            topic,
            level,
            focus,
            export,
            output_dir,
            output,
        } => cmd_guide(
            &settings,
            &topic,
            level.as_deref(),
            focus.as_deref(),
            export,
            output_dir.as_deref(),
            output.as_deref(),
        )?,
        Commands::Questions {
            topic,
            count,
            types,
            output,
        } => cmd_questions(&settings, &topic, count.as_deref(), &types, output.as_deref())?,
        Commands::Explain {
            topic,
            level,
            output,
        } => cmd_explain(&settings, &topic, level.as_deref(), output.as_deref())?,
        Commands::Summarize {
            text,
            file,
            summary_type,
            output,
        } => cmd_summarize(
            &settings,
            text.as_deref(),
            file.as_deref(),
            summary_type.as_deref(),
            output.as_deref(),
        )?,
        Commands::Workflows => {
            cmd_workflows(&settings);
            true
        }
    };

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}
