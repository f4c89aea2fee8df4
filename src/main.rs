mod console;

use anyhow::Context;
use console::ConsolePrompt;
use igc::app::Session;
use igc::config::Settings;
use igc::system::LocalFileSystem;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 로그 필터 환경 변수
const LOG_ENV: &str = "IGC_LOG";

const DEFAULT_LOG_FILTER: &str = "igc=info,warn";

/// 로그는 표준 에러로 (목록 출력과 섞이지 않도록)
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings_path =
        Settings::default_path().context("no configuration directory available")?;
    let mut settings = Settings::load_from(&settings_path);
    let cwd = env::current_dir().context("cannot read the current directory")?;
    settings.ensure_drive(cwd);

    let mut fs = LocalFileSystem::new();
    for (drive, root) in settings.drive_table() {
        info!(drive = %drive, root = %root.display(), "drive mounted");
        fs.mount(drive, root);
    }

    let mut session = Session::from_settings(
        fs,
        &settings.settings,
        &settings.limits,
        settings.first_drive(),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompt = ConsolePrompt::new(stdin.lock(), stdout.lock());
    console::run(&mut session, &mut prompt).context("console I/O failed")?;

    settings.settings = session.panel_settings();
    settings
        .save_to(&settings_path)
        .with_context(|| format!("cannot save settings to {}", settings_path.display()))?;
    info!(path = %settings_path.display(), "settings saved");
    Ok(())
}
