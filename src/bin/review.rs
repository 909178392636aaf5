use clap::Parser;
use colored::Colorize;
use replaypoker::Millis;
use replaypoker::director::Playback;
use replaypoker::session::Descriptor;
use replaypoker::sources::ReplaySource;
use replaypoker::sources::ScriptedSource;
use replaypoker::store::Console;
use replaypoker::store::Store;
use replaypoker::table::Model;
use replaypoker::update::Message;

/// Replay a recorded hand in the terminal.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Session descriptor JSON
    session: std::path::PathBuf,
    /// Playback speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Autoplay to the end instead of stepping interactively
    #[arg(long)]
    auto: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    replaypoker::log();
    tokio::spawn(async {
        tokio::signal::ctrl_c().await.ok();
        println!();
        log::warn!("interrupted, exiting");
        std::process::exit(0);
    });
    let args = Args::parse();
    let text = std::fs::read_to_string(&args.session)?;
    let descriptor: Descriptor = serde_json::from_str(&text)?;
    let source = ReplaySource::from(&descriptor);
    let mut store = Store::new(Box::new(ScriptedSource), Box::new(Console));
    store.load(descriptor, Box::new(source))?;
    store.set_speed(args.speed);
    let _sub = store.subscribe(render);
    match args.auto {
        true => autoplay(store).await,
        false => stepping(store).await,
    }
    Ok(())
}

/// Run the whole log under the Director's auto-advance.
async fn autoplay(mut store: Store) {
    store.dispatch(Message::Autoplay);
    let start = std::time::Instant::now();
    let mut frames = tokio::time::interval(std::time::Duration::from_millis(16));
    loop {
        frames.tick().await;
        store.tick(start.elapsed().as_millis() as Millis);
        if store.director().state() != Playback::Playing && store.director().gate() == 0 {
            break;
        }
    }
    log::info!("replay complete");
}

/// Step the log one event at a time from a menu.
async fn stepping(mut store: Store) {
    let start = std::time::Instant::now();
    loop {
        let choice = dialoguer::Select::new()
            .with_prompt("review")
            .items(&["step", "seek", "quit"])
            .default(0)
            .interact()
            .unwrap_or(2);
        match choice {
            0 => store.dispatch(Message::Advance),
            1 => {
                let index: usize = dialoguer::Input::new()
                    .with_prompt("event index")
                    .interact_text()
                    .unwrap_or(0);
                store.dispatch(Message::Seek(index));
            }
            _ => break,
        }
        settle(&mut store, &start).await;
    }
}

/// Tick until the pending step's effects have all concluded.
async fn settle(store: &mut Store, start: &std::time::Instant) {
    loop {
        tokio::time::sleep(std::time::Duration::from_millis(16)).await;
        store.tick(start.elapsed().as_millis() as Millis);
        if store.director().gate() == 0 {
            break;
        }
    }
}

fn render(model: &Model) {
    if !model.is_loaded() {
        return;
    }
    println!("{}", model);
    for banner in &model.banners {
        println!("  {}", banner.text.yellow());
    }
    if let Some(review) = model.review {
        println!("  {}", format!("event {}/{}", review.cursor, review.length).dimmed());
    }
}
