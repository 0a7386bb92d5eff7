use crossterm::{cursor, event, execute, terminal};
use std::io::{self, stdout};

use flappy_sprite::assets::Assets;
use flappy_sprite::audio::Effects;
use flappy_sprite::config::{CONFIG_ENV, Config};
use flappy_sprite::driver::{Clock, FrameDriver, SystemClock};
use flappy_sprite::input::{self, Action};
use flappy_sprite::terminal::TerminalView;
use flappy_sprite::{GameState, PixelCanvas};

fn run(config: &Config, out: &mut io::Stdout) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut view = TerminalView::new(cols, rows);
    let mut canvas = PixelCanvas::new(config.width, config.height);
    let mut effects = Effects::new(config);

    // Images first; the course is built from them
    let assets = Assets::load(config.width, config.height);
    let mut game = GameState::new(assets, config.width, config.height);
    let mut driver = FrameDriver::new(SystemClock, config.fps);

    loop {
        // Input until the next frame is due
        while event::poll(driver.time_to_next_frame())? {
            let ev = event::read()?;
            match input::dispatch(&ev, &mut game, driver.clock().now()) {
                Some(Action::Quit) => return Ok(()),
                Some(Action::Resize(c, r)) => view.resize(c, r),
                Some(Action::Activate) | None => {}
            }
            effects.dispatch(game.take_cues());
        }

        driver.tick(&mut game, &mut canvas);
        effects.dispatch(game.take_cues());
        view.present(&canvas, out)?;
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let config = Config::from_args(std::env::args().skip(1), std::env::var(CONFIG_ENV).ok())?;
    log::info!("starting with {config:?}");

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        event::EnableMouseCapture,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let result = run(&config, &mut out);
    cleanup(&mut out)?;
    result
}
