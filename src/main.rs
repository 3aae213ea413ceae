// Audio session demo - terminal stand-in for the sample scene
//
// Reads commands from stdin and re-reads the session on every frame tick so
// the displayed state follows changes the OS makes on its own (route
// changes, interruptions, competing apps).

use std::time::Duration;

use anyhow::Result;
use audio_session_bridge::log::init_tracing;
use audio_session_bridge::session::{parse_option_list, AudioSession};
use audio_session_bridge::{create_session, BridgeConfig, Category, CategoryOptions, Mode, SetActiveOptions};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq)]
enum DemoCommand {
    Help,
    Category(Category, CategoryOptions),
    Mode(Mode),
    /// Re-apply the current category with a new option set
    Options(CategoryOptions),
    Activate,
    Deactivate,
    Detail(bool),
    Info,
    Print,
    Quit,
}

fn parse_options(list: &str) -> CategoryOptions {
    let parsed = parse_option_list(list);
    for token in &parsed.rejected {
        warn!("Ignoring unknown option: {}", token);
    }
    parsed.options
}

fn parse_command(line: &str) -> std::result::Result<DemoCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty command".to_string());
    };
    // Option lists may contain spaces after commas
    let rest = parts.collect::<Vec<_>>().join(" ");

    match verb {
        "help" | "?" => Ok(DemoCommand::Help),
        "category" => {
            let (name, options) = rest.split_once(' ').unwrap_or((rest.as_str(), ""));
            let category = Category::resolve(name)
                .ok_or_else(|| format!("unknown category '{}'", name))?;
            Ok(DemoCommand::Category(category, parse_options(options)))
        }
        "mode" => Mode::resolve(&rest)
            .map(DemoCommand::Mode)
            .ok_or_else(|| format!("unknown mode '{}'", rest)),
        "options" => Ok(DemoCommand::Options(parse_options(&rest))),
        "activate" => Ok(DemoCommand::Activate),
        "deactivate" => Ok(DemoCommand::Deactivate),
        "detail" => match rest.as_str() {
            "on" => Ok(DemoCommand::Detail(true)),
            "off" => Ok(DemoCommand::Detail(false)),
            other => Err(format!("detail expects on|off, got '{}'", other)),
        },
        "info" => Ok(DemoCommand::Info),
        "print" => Ok(DemoCommand::Print),
        "quit" | "exit" => Ok(DemoCommand::Quit),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn print_help() {
    let categories: Vec<_> = Category::ALL.iter().map(|c| c.name()).collect();
    let modes: Vec<_> = Mode::ALL.iter().map(|m| m.name()).collect();
    let options: Vec<_> = CategoryOptions::FLAGS
        .iter()
        .filter_map(|o| o.option_name())
        .collect();

    println!("{}", "Commands:".bold());
    println!("  category <Name> [opt,opt]   {}", categories.join(" | "));
    println!("  mode <Name>                 {}", modes.join(" | "));
    println!("  options [opt,opt]           {}", options.join(" | "));
    println!("  activate | deactivate");
    println!("  detail on|off | info | print | help | quit");
}

/// What the last frame showed
///
/// `info` is the full snapshot, so route, volume and hardware changes made
/// by the OS count as a new frame even when category, mode and options hold.
#[derive(Debug, Clone, PartialEq)]
struct FrameState {
    category: Option<Category>,
    mode: Option<Mode>,
    options: CategoryOptions,
    info: Option<String>,
}

impl FrameState {
    fn read(session: &dyn AudioSession, detail: bool) -> Self {
        Self {
            category: session.category().ok(),
            mode: session.mode().ok(),
            options: session.category_options(),
            info: session.info_string(detail),
        }
    }
}

struct SessionView {
    detail: bool,
    last: Option<FrameState>,
    renders: u64,
}

impl SessionView {
    fn new(detail: bool) -> Self {
        Self {
            detail,
            last: None,
            renders: 0,
        }
    }

    /// Re-reads the session every frame; renders only when the state changed or `force`
    fn refresh(&mut self, session: &dyn AudioSession, force: bool) {
        let frame = FrameState::read(session, self.detail);
        if !force && self.last.as_ref() == Some(&frame) {
            return;
        }

        let show = |value: Option<String>| value.unwrap_or_else(|| "?".to_string());
        println!(
            "{} category={} mode={} options={}",
            "STATE".bright_green(),
            show(frame.category.map(|c| c.to_string())).bright_white(),
            show(frame.mode.map(|m| m.to_string())).bright_white(),
            frame.options.to_string().bright_white()
        );
        println!(
            "{}",
            session
                .info_string(self.detail)
                .unwrap_or_else(|| "Null".to_string())
        );

        self.last = Some(frame);
    }

    fn apply(&mut self, session: &dyn AudioSession, command: DemoCommand) {
        let ok = match command {
            DemoCommand::Help => {
                print_help();
                true
            }
            DemoCommand::Category(category, options) => session.set_category(category, options),
            DemoCommand::Mode(mode) => session.set_mode(mode),
            DemoCommand::Options(options) => match session.category() {
                Ok(category) => session.set_category(category, options),
                Err(e) => {
                    error!("Cannot re-apply options: {}", e);
                    false
                }
            },
            DemoCommand::Activate => {
                session.set_active(true, SetActiveOptions::NotifyOthersOnDeactivation)
            }
            DemoCommand::Deactivate => {
                session.set_active(false, SetActiveOptions::NotifyOthersOnDeactivation)
            }
            DemoCommand::Detail(detail) => {
                self.detail = detail;
                true
            }
            DemoCommand::Info => true,
            DemoCommand::Print => {
                session.print_info();
                true
            }
            DemoCommand::Quit => true,
        };

        if !ok {
            println!("{}", "request refused".bright_red());
        }
        self.refresh(session, true);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = BridgeConfig::from_env();
    init_tracing(&config);

    let session = create_session(&config)?;
    let mut view = SessionView::new(config.detail_by_default);

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => view.refresh(session.as_ref(), false),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(DemoCommand::Quit) => break,
                    Ok(command) => view.apply(session.as_ref(), command),
                    Err(message) => println!("{} {}", "?".yellow(), message),
                }
            }
        }
    }

    Ok(())
}
