//! Hunt command handlers.

use super::HuntCommand;
use huntcraft::{Hunt, HuntRepository, HuntUpdate, LocationStop};

/// Handles the hunt subcommands.
#[tracing::instrument(skip_all)]
pub async fn handle_hunt_command<H>(store: &H, command: HuntCommand) -> anyhow::Result<()>
where
    H: HuntRepository + ?Sized,
{
    match command {
        HuntCommand::Create {
            title,
            city,
            theme,
            tone,
        } => {
            let hunt = Hunt::builder()
                .title(title)
                .city(city)
                .theme(theme)
                .tone(tone)
                .build()?;
            let hunt = store.create_hunt(hunt).await?;
            tracing::info!(hunt_id = %hunt.id(), "Hunt created");
            println!("{}", hunt.id());
        }
        HuntCommand::Show { hunt } => {
            let hunt = store.get_hunt(hunt).await?;
            let stops = store.list_locations(*hunt.id()).await?;
            print_hunt(&hunt, &stops);
        }
        HuntCommand::Edit {
            hunt,
            title,
            description,
            city,
            theme,
            tone,
        } => {
            let mut update = HuntUpdate::builder();
            if let Some(title) = title {
                update.title(title);
            }
            if let Some(description) = text_change(description) {
                update.description(description);
            }
            if let Some(city) = text_change(city) {
                update.city(city);
            }
            if let Some(theme) = text_change(theme) {
                update.theme(theme);
            }
            if let Some(tone) = text_change(tone) {
                update.tone(tone);
            }
            let update = update.build()?;
            if update.is_empty() {
                anyhow::bail!("nothing to change; pass at least one field");
            }
            let hunt = store.update_hunt(hunt, &update).await?;
            tracing::info!(hunt_id = %hunt.id(), "Hunt updated");
            let stops = store.list_locations(*hunt.id()).await?;
            print_hunt(&hunt, &stops);
        }
        HuntCommand::Settings {
            hunt,
            play_order,
            final_stop_mode,
        } => {
            let hunt = store
                .update_hunt(hunt, &HuntUpdate::settings(play_order, final_stop_mode))
                .await?;
            println!(
                "{}: play order {}, {}",
                hunt.title(),
                hunt.play_order(),
                hunt.final_stop_mode()
            );
        }
    }
    Ok(())
}

/// `None` leaves a field alone; a blank value clears it.
fn text_change(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn print_hunt(hunt: &Hunt, stops: &[LocationStop]) {
    println!("{} ({})", hunt.title(), hunt.id());
    if let Some(description) = hunt.description() {
        println!("  About:  {}", description);
    }
    if let Some(city) = hunt.city() {
        println!("  City:   {}", city);
    }
    println!(
        "  Theme:  {}",
        hunt.theme().as_deref().unwrap_or("(none)")
    );
    println!("  Tone:   {}", hunt.tone().as_deref().unwrap_or("(none)"));
    println!("  Status: {}", hunt.status());
    println!(
        "  Route:  {}, {}",
        hunt.play_order(),
        hunt.final_stop_mode()
    );
    println!("  Stops:  {}", stops.len());
    for stop in stops {
        super::location::print_stop(stop);
    }
}
