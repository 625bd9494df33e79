//! One-shot classifier: inspect a screen point the way the watcher would
//! and print the resulting report as JSON. The tool for answering "why did
//! that click (not) navigate?".

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "upclick-probe",
    about = "Classify a screen point the way upclick would, as JSON"
)]
struct Args {
    /// X coordinate (defaults to the current cursor position)
    #[arg(long, requires = "y")]
    x: Option<i32>,

    /// Y coordinate (defaults to the current cursor position)
    #[arg(long, requires = "x")]
    y: Option<i32>,

    /// Top-level window class to scope to
    #[arg(long, default_value = "CabinetWClass")]
    window_class: String,

    /// Classify whatever window the point is over, ignoring the class check
    #[arg(long)]
    any_window: bool,

    /// Maximum ancestor generations to inspect
    #[arg(long, default_value = "5")]
    max_depth: usize,

    /// Compact JSON output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

#[cfg(windows)]
fn run(args: Args) -> Result<(), upclick_core::errors::UpclickError> {
    use upclick_core::com::ComGuard;
    use upclick_core::config::Settings;
    use upclick_core::dispatch::{evaluate, PointInspector};
    use upclick_core::errors::UpclickError;
    use upclick_core::monitor::DoubleClick;
    use upclick_core::uia::UiaInspector;
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

    let (x, y) = match (args.x, args.y) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            let mut pt = POINT::default();
            unsafe { GetCursorPos(&mut pt) }
                .map_err(|e| UpclickError::TreeError(format!("GetCursorPos: {e}")))?;
            (pt.x, pt.y)
        }
    };

    let _com = ComGuard::init()?;
    let mut inspector = UiaInspector::new()?;
    let hit = inspector.hit_test(x, y)?;

    let mut settings = Settings {
        target_window_class: args.window_class,
        max_walk_depth: args.max_depth,
        ..Settings::default()
    };
    if args.any_window {
        if let Some(hit) = hit.as_ref() {
            settings.target_window_class = hit.window_class.clone();
        }
    }

    let report = evaluate(DoubleClick { x, y }, hit, &settings);

    let json = if args.compact {
        serde_json::to_string(&report).unwrap()
    } else {
        serde_json::to_string_pretty(&report).unwrap()
    };
    println!("{json}");
    Ok(())
}

fn main() {
    let args = Args::parse();

    #[cfg(windows)]
    {
        if let Err(err) = run(args) {
            eprintln!("upclick-probe failed: {err}");
            std::process::exit(1);
        }
    }

    #[cfg(not(windows))]
    {
        let _ = args;
        eprintln!("upclick-probe only runs on Windows");
        std::process::exit(1);
    }
}
