//! Read-only listings: `boardkit boards`, `boardkit resources` and `boardkit pins`.

use boardkit_boards::BOARDS;
use boardkit_constraints::{PinAssignment, Platform, Resource, ResourceBody};

use crate::project::board_and_project;
use crate::{BoardsArgs, GlobalArgs, InspectArgs, ReportFormat};

/// Runs the `boardkit boards` command.
pub fn run_boards(args: &BoardsArgs) -> Result<i32, Box<dyn std::error::Error>> {
    match args.format {
        ReportFormat::Text => {
            for board in BOARDS {
                println!(
                    "{:<28} {:<16} {} ({})",
                    board.name,
                    board.part_number(),
                    board.title,
                    board.vendor
                );
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(BOARDS)?),
    }
    Ok(0)
}

/// Assembles the board selected by `--board` or the project configuration.
fn platform(
    board: Option<&str>,
    global: &GlobalArgs,
) -> Result<Platform, Box<dyn std::error::Error>> {
    let (board, project) = board_and_project(board, global)?;
    let executable = project.as_ref().and_then(|p| p.executable.as_deref());
    Ok(board.platform(executable)?)
}

/// Runs the `boardkit resources` command.
pub fn run_resources(
    args: &InspectArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let platform = platform(args.board.as_deref(), global)?;
    match args.format {
        ReportFormat::Text => {
            for resource in platform.resources() {
                print!("{}", describe_resource(resource));
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(platform.resources())?),
    }
    Ok(0)
}

/// Runs the `boardkit pins` command.
pub fn run_pins(
    args: &InspectArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let platform = platform(args.board.as_deref(), global)?;
    match args.format {
        ReportFormat::Text => {
            for assignment in platform.pin_assignments() {
                println!("{}", describe_assignment(assignment));
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(platform.pin_assignments())?)
        }
    }
    Ok(0)
}

/// Formats one resource as one line, plus one indented line per subsignal.
fn describe_resource(resource: &Resource) -> String {
    let mut line = resource.id().to_string();
    match resource.body() {
        ResourceBody::Pins(pins) => {
            line.push_str(&format!(" {pins}"));
            if let Some(clock) = resource.clock() {
                line.push_str(&format!(" @ {}", clock.frequency));
            }
            if !resource.attrs().is_empty() {
                line.push_str(&format!(" {}", resource.attrs()));
            }
            line.push('\n');
        }
        ResourceBody::Subsignals(subs) => {
            if !resource.attrs().is_empty() {
                line.push_str(&format!(" {}", resource.attrs()));
            }
            line.push('\n');
            for sub in subs {
                line.push_str(&format!("    {:<10} {}", sub.name, sub.pins));
                if !sub.attrs.is_empty() {
                    line.push_str(&format!(" {}", sub.attrs));
                }
                line.push('\n');
            }
        }
    }
    line
}

fn describe_assignment(a: &PinAssignment) -> String {
    let mut line = format!(
        "{:<24} {:<2} {}{}",
        a.port,
        a.dir.short(),
        if a.invert { "!" } else { "" },
        a.pins.join(" ")
    );
    if a.differential {
        line.push_str(" (diff)");
    }
    if let Some(clock) = a.clock {
        line.push_str(&format!(" @ {clock}"));
    }
    if !a.attrs.is_empty() {
        line.push_str(&format!(" {}", a.attrs));
    }
    line
}
