//! Resident watcher: double-click empty space in a File Explorer window to
//! navigate to the parent folder.
//!
//! The main thread installs the mouse hook and pumps messages; a worker
//! thread classifies clicks and sends the navigation chord. Ctrl+C posts
//! `WM_QUIT` to the pump and the process exits.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "upclick",
    about = "Double-click empty Explorer space to go up one folder"
)]
struct Args {
    /// Double-click window in milliseconds
    #[arg(long, default_value = "250")]
    threshold_ms: u64,

    /// Top-level window class the tool acts within
    #[arg(long, default_value = "CabinetWClass")]
    window_class: String,

    /// Maximum ancestor generations inspected per click
    #[arg(long, default_value = "5")]
    max_depth: usize,

    /// Queue poll interval in milliseconds
    #[arg(long, default_value = "100")]
    poll_ms: u64,

    /// Log each probed generation of every classified click
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(windows)]
fn run(args: Args) -> Result<(), upclick_core::errors::UpclickError> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use upclick_core::com::ComGuard;
    use upclick_core::config::Settings;
    use upclick_core::dispatch::Dispatcher;
    use upclick_core::errors::UpclickError;
    use upclick_core::hook::{self, MouseMonitor};
    use upclick_core::input::KeySender;
    use upclick_core::monitor;
    use upclick_core::uia::UiaInspector;

    let settings = Arc::new(Settings {
        double_click_threshold: Duration::from_millis(args.threshold_ms),
        target_window_class: args.window_class,
        max_walk_depth: args.max_depth,
        poll_interval: Duration::from_millis(args.poll_ms),
        debug: args.verbose,
        ..Settings::default()
    });

    let shutdown = Arc::new(AtomicBool::new(false));
    let (tx, rx) = monitor::click_channel();

    let monitor = MouseMonitor::install(settings.double_click_threshold, tx, rx.clone())?;

    let worker = {
        let settings = Arc::clone(&settings);
        let shutdown = Arc::clone(&shutdown);
        std::thread::spawn(move || {
            let _com = match ComGuard::init() {
                Ok(guard) => guard,
                Err(err) => {
                    log::error!("worker COM init failed: {err}");
                    return;
                }
            };
            let inspector = match UiaInspector::new() {
                Ok(inspector) => inspector,
                Err(err) => {
                    log::error!("UI Automation init failed: {err}");
                    return;
                }
            };
            let keys = KeySender::new(&settings.nav_chord);
            Dispatcher::new(inspector, keys, Arc::clone(&settings), rx, shutdown).run();
        })
    };

    let pump_thread = monitor.thread_id();
    ctrlc::set_handler({
        let shutdown = Arc::clone(&shutdown);
        move || {
            shutdown.store(true, Ordering::SeqCst);
            hook::post_quit(pump_thread);
        }
    })
    .map_err(|e| UpclickError::HookError(format!("Ctrl+C handler: {e}")))?;

    log::info!(
        "upclick running: double-click empty space in a {} window to go up, Ctrl+C to exit",
        settings.target_window_class
    );

    monitor.pump();

    shutdown.store(true, Ordering::SeqCst);
    drop(monitor);
    let _ = worker.join();
    Ok(())
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if args.verbose { "debug" } else { "info" },
    ))
    .init();

    #[cfg(windows)]
    {
        if let Err(err) = run(args) {
            eprintln!("upclick failed: {err}");
            std::process::exit(1);
        }
    }

    #[cfg(not(windows))]
    {
        let _ = args;
        eprintln!("upclick only runs on Windows");
        std::process::exit(1);
    }
}
