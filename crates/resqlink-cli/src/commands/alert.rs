use resqlink_core::{ArmError, ArmingState, Config, Event};

use crate::host;

fn print_event(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::CountdownArmed {
            remaining,
            recipients,
            ..
        } => {
            println!("Alerting {recipients} emergency contact(s). Press Ctrl-C to cancel.");
            println!("Sending alert in {remaining}...");
        }
        Event::CountdownTick { remaining, .. } => println!("{remaining}..."),
        Event::CountdownCancelled { .. } => println!("Emergency alert cancelled."),
        Event::AlertDispatched {
            report,
            history_error,
            ..
        } => {
            println!(
                "Alert sent to {} of {} emergency contacts.",
                report.success_count, report.total
            );
            if history_error.is_some() {
                eprintln!("warning: the alert could not be saved to history");
            }
        }
    }
    Ok(())
}

pub async fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut controller = host::controller(&config)?;

    let armed = match controller.arm() {
        Ok(event) => event,
        Err(ArmError::NoContacts) => {
            return Err(format!(
                "{}\nAdd one with `resqlink contacts add <name> <phone>`.",
                ArmError::NoContacts
            )
            .into());
        }
        Err(e) => return Err(e.into()),
    };
    print_event(&armed, json)?;

    while matches!(controller.state(), ArmingState::Armed { .. }) {
        let ticked = tokio::select! {
            tick = controller.next_tick() => tick.is_some(),
            Ok(()) = tokio::signal::ctrl_c() => false,
        };

        let event = if ticked {
            controller.tick().await
        } else {
            controller.cancel()
        };
        if let Some(event) = event {
            print_event(&event, json)?;
        }
    }
    Ok(())
}
