//! Story command handlers.

use super::{GenerateArgs, StoryCommand};
use anyhow::Context;
use huntcraft::{
    ChatCompletionsGateway, FillStyle, GenerationSettings, HuntId, HuntRepository,
    HuntcraftConfig, LocationOptions, OptionSelector, RenderStyle, StoryBoard, StoryGenerator,
    StoryRepository, UnfilledStyle,
};
use std::sync::Arc;

/// Handles the story subcommands.
#[tracing::instrument(skip_all)]
pub async fn handle_story_command<S>(
    store: Arc<S>,
    command: StoryCommand,
    config: &HuntcraftConfig,
) -> anyhow::Result<()>
where
    S: HuntRepository + StoryRepository + 'static,
{
    match command {
        StoryCommand::Generate(args) => generate(store, args, config).await,
        StoryCommand::Show { hunt, json } => show(store.as_ref(), hunt, json).await,
        StoryCommand::Select { location, option } => {
            let selector = OptionSelector::new(Arc::clone(&store), Arc::clone(&store));
            let chosen = selector.select_option(location, option).await?;
            println!(
                "Selected option {} at {}: {}",
                chosen.option_number(),
                location,
                chosen.madlib_word()
            );
            Ok(())
        }
        StoryCommand::Clear { location } => {
            let selector = OptionSelector::new(Arc::clone(&store), Arc::clone(&store));
            selector.clear_selection(location).await?;
            println!("Cleared selection at {}", location);
            Ok(())
        }
        StoryCommand::Render {
            hunt,
            emphasis,
            mark_unfilled,
        } => {
            let board = load_board(store.as_ref(), hunt).await?;
            let style = RenderStyle::new(
                if emphasis {
                    FillStyle::Emphasis
                } else {
                    FillStyle::Plain
                },
                if mark_unfilled {
                    UnfilledStyle::Marker
                } else {
                    UnfilledStyle::Literal
                },
            );
            let rendered = board.render(style);
            println!("{}", rendered.text());
            if !rendered.is_complete() {
                eprintln!(
                    "{} of {} blanks filled",
                    rendered.filled(),
                    rendered.filled() + rendered.unfilled()
                );
            }
            Ok(())
        }
    }
}

async fn generate<S>(store: Arc<S>, args: GenerateArgs, config: &HuntcraftConfig) -> anyhow::Result<()>
where
    S: HuntRepository + StoryRepository + 'static,
{
    let gateway = ChatCompletionsGateway::from_env(config.gateway().clone())
        .context("Story gateway is not configured")?;
    let generator = StoryGenerator::new(Arc::clone(&store), Arc::clone(&store), Arc::new(gateway));

    let mut settings = GenerationSettings::builder();
    settings.age_rating(args.age_rating);
    if let Some(theme) = args.theme {
        settings.theme(theme);
    }
    if let Some(tone) = args.tone {
        settings.tone(tone);
    }
    if let Some(notes) = args.notes {
        settings.custom_notes(notes);
    }
    let settings = settings.build()?;

    let outcome = generator.generate(args.hunt, &settings).await?;
    println!(
        "Generated story {} with {} options",
        outcome.story().id(),
        outcome.options().len()
    );
    for warning in outcome.warnings() {
        println!("warning: {}", warning);
    }
    Ok(())
}

async fn load_board<S>(store: &S, hunt: HuntId) -> anyhow::Result<StoryBoard>
where
    S: HuntRepository + StoryRepository + ?Sized,
{
    StoryBoard::load(store, store, hunt)
        .await?
        .with_context(|| format!("Hunt {} has no story yet", hunt))
}

async fn show<S>(store: &S, hunt: HuntId, json: bool) -> anyhow::Result<()>
where
    S: HuntRepository + StoryRepository + ?Sized,
{
    let board = load_board(store, hunt).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    for (i, scene) in board.story().intro_scenes().iter().enumerate() {
        println!("Scene {}: {}\n", i + 1, scene);
    }
    for location in board.locations() {
        print_location(location);
    }
    println!(
        "Final ({} of {} selected):\n{}",
        board.selected_count(),
        board.locations().len(),
        board.render(RenderStyle::host_preview()).text()
    );
    Ok(())
}

fn print_location(location: &LocationOptions) {
    let stop = location.location();
    println!("{}. {} ({})", stop.order_index(), stop.name(), stop.id());
    for option in location.options() {
        let marker = if option.is_selected() { "*" } else { " " };
        println!(
            "  {} [{}] {}",
            marker,
            option.option_number(),
            option.story_text()
        );
        println!("        Riddle: {}", option.riddle_text());
        println!("        Answer: {}", option.riddle_answer());
    }
    println!();
}
