use clap::Subcommand;

use super::open_tracker;

#[derive(Subcommand)]
pub enum TargetAction {
    /// Print the daily word target
    Get,
    /// Set the daily word target (positive integer)
    Set {
        /// New target
        value: String,
    },
}

pub fn run(action: TargetAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut scheduler = open_tracker()?;

    match action {
        TargetAction::Get => println!("{}", scheduler.daily_target()),
        TargetAction::Set { value } => {
            let target = value.parse()?;
            let awarded = scheduler.set_daily_target(target);
            println!("daily target set to {target}");
            if awarded {
                println!(
                    "Daily target reached! Streak: {}",
                    scheduler.current_streak()
                );
            }
        }
    }
    Ok(())
}
