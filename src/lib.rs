//! Deterministic state-update engine and effect scheduler for a turn-based
//! poker replay/simulation UI.
//!
//! The crate is a Model-Update-Store triad plus a single-threaded timed
//! coordinator (the Director) and a pluggable decision-source protocol.
//! State transitions are pure, subscribers hear only about observable
//! change, and every timed side effect is sequenced through one scheduler.

pub mod director;
pub mod session;
pub mod sources;
pub mod store;
pub mod table;
pub mod update;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Stack sizes, bet amounts, and pot totals in big blinds.
pub type Chips = i16;
/// Seat index around the table.
pub type Position = usize;
/// Monotonically increasing token correlating an effect with the
/// snapshot that requested it.
pub type Tx = u64;
/// Timeline instants and delays in milliseconds, as delivered by the host.
pub type Millis = u64;

// ============================================================================
// SCHEDULER PARAMETERS
// ============================================================================
/// Interval between automatic advance steps at 1x speed.
pub const AUTO_STEP: Millis = 900;
/// Slowest allowed playback multiplier. Clamping here keeps scaled
/// delays finite and positive.
pub const MIN_SPEED: f32 = 0.25;
/// Fastest allowed playback multiplier.
pub const MAX_SPEED: f32 = 8.0;

// ============================================================================
// PRESENTATION PARAMETERS
// ============================================================================
/// Transient banner lifetime.
pub const BANNER_TTL: Millis = 4_000;
/// Most banners shown at once. Older banners are dropped first.
pub const MAX_BANNERS: usize = 4;

// ============================================================================
// DECISION SOURCE PARAMETERS
// ============================================================================
/// Base think time before a source decision is delivered.
pub const THINK_BASE: Millis = 400;
/// Additional think time per seat index, staggering deliveries.
pub const THINK_STEP: Millis = 150;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "console")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
