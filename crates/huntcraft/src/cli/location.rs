//! Location command handlers.

use super::LocationCommand;
use huntcraft::{HuntRepository, LocationStop, LocationUpdate, NewLocationStop};

/// Handles the location subcommands.
#[tracing::instrument(skip_all)]
pub async fn handle_location_command<H>(store: &H, command: LocationCommand) -> anyhow::Result<()>
where
    H: HuntRepository + ?Sized,
{
    match command {
        LocationCommand::Add {
            hunt,
            name,
            address,
            is_final,
        } => {
            let stop = NewLocationStop::builder()
                .name(name)
                .address(address)
                .is_final_stop(is_final)
                .build()?;
            let stop = store.add_location(hunt, stop).await?;
            print_stop(&stop);
        }
        LocationCommand::List { hunt } => {
            for stop in store.list_locations(hunt).await? {
                print_stop(&stop);
            }
        }
        LocationCommand::Rename { location, name } => {
            let stop = store
                .update_location(location, &LocationUpdate::rename(name))
                .await?;
            print_stop(&stop);
        }
        LocationCommand::Delete { location } => {
            store.delete_location(location).await?;
            println!("Deleted {}", location);
        }
    }
    Ok(())
}

/// Prints one stop as a single line.
pub fn print_stop(stop: &LocationStop) {
    let marker = if *stop.is_final_stop() { " [final]" } else { "" };
    match stop.address() {
        Some(address) => println!(
            "  {:>2}. {} - {} ({}){}",
            stop.order_index(),
            stop.name(),
            address,
            stop.id(),
            marker
        ),
        None => println!(
            "  {:>2}. {} ({}){}",
            stop.order_index(),
            stop.name(),
            stop.id(),
            marker
        ),
    }
}
