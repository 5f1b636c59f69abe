use std::{
    fmt,
    io::{self, Write},
    mem::MaybeUninit,
    os::fd::{AsRawFd, RawFd},
};

use core_2048::{BoardEngine, GameStatus, Grid};

const SQUARE_HEIGHT: usize = 3;
const SQUARE_WIDTH: usize = 2 * (SQUARE_HEIGHT + 1) - 1;
const COLOUR_TABLE: [u8; 7] = [90, 33, 31, 32, 33, 36, 35];
const READ_TIMEOUT_DECISECONDS: libc::cc_t = 2;

/// Line shown under the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    NewGame,
    Playing,
    Won(u64),
    Lost,
}

impl Message {
    pub fn for_status(status: GameStatus, target: u64) -> Self {
        match status {
            GameStatus::InProgress => Self::Playing,
            GameStatus::Won => Self::Won(target),
            GameStatus::Lost => Self::Lost,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewGame => f.write_str("NEW GAME! USE ARROWS/WASD/HJKL. R TO RESTART, Q TO QUIT."),
            Self::Playing => f.write_str("ARROWS/WASD/HJKL TO MOVE. R TO RESTART, Q TO QUIT."),
            Self::Won(target) => write!(f, "YOU REACHED {target}! PRESS R TO RESTART, Q TO QUIT."),
            Self::Lost => f.write_str("GAME OVER. PRESS R TO RESTART."),
        }
    }
}

fn rule(size: usize, left: &str, mid: &str, right: &str) -> String {
    let segment = "━".repeat(SQUARE_WIDTH);
    let inner = vec![segment; size].join(mid);

    format!("{left}{inner}{right}")
}

/// Lines written by `draw_board`, so a redraw knows how far to move back up.
pub const fn frame_height(size: usize) -> usize {
    size * (SQUARE_HEIGHT + 1) + 3
}

fn cell_colour(value: u64) -> Option<u8> {
    (value != 0).then(|| {
        let exponent = value.trailing_zeros() as usize;

        COLOUR_TABLE[(exponent - 1) % COLOUR_TABLE.len()]
    })
}

fn draw_padding_line(out: &mut impl Write, row: &[u64]) -> io::Result<()> {
    for &value in row {
        match cell_colour(value) {
            Some(colour) => write!(out, "┃\x1b[{}m{:w$}\x1b[m", colour + 10, "", w = SQUARE_WIDTH)?,
            None => write!(out, "┃{:w$}", "", w = SQUARE_WIDTH)?,
        }
    }

    out.write_all("┃\x1b[K\n".as_bytes())
}

fn draw_board_row(out: &mut impl Write, row: &[u64]) -> io::Result<()> {
    for _ in 0..(SQUARE_HEIGHT - 1) / 2 {
        draw_padding_line(out, row)?;
    }

    for &value in row {
        match cell_colour(value) {
            Some(colour) => write!(out, "┃\x1b[7m\x1b[{colour}m{value:^w$}\x1b[m", w = SQUARE_WIDTH)?,
            None => write!(out, "┃{:w$}", "", w = SQUARE_WIDTH)?,
        }
    }

    out.write_all("┃\x1b[K\n".as_bytes())?;

    for _ in 0..SQUARE_HEIGHT / 2 {
        draw_padding_line(out, row)?;
    }

    Ok(())
}

fn draw_grid(out: &mut impl Write, grid: &Grid) -> io::Result<()> {
    let size = grid.size();

    writeln!(out, "{}\x1b[K", rule(size, "┏", "┳", "┓"))?;

    for (i, row) in grid.rows().enumerate() {
        if i != 0 {
            writeln!(out, "{}\x1b[K", rule(size, "┣", "╋", "┫"))?;
        }

        draw_board_row(out, row)?;
    }

    writeln!(out, "{}\x1b[K", rule(size, "┗", "┻", "┛"))
}

pub fn draw_board<R>(
    out: &mut impl Write,
    engine: &BoardEngine<R>,
    message: Message,
) -> io::Result<()> {
    writeln!(
        out,
        "Score: {}   Highest tile: {}\x1b[K",
        engine.score(),
        engine.highest_tile()
    )?;

    draw_grid(out, engine.grid())?;

    writeln!(out, "{message}\x1b[K")?;
    out.flush()
}

/// Draws over the frame written by the previous `draw_board` call.
pub fn redraw_board<R>(
    out: &mut impl Write,
    engine: &BoardEngine<R>,
    message: Message,
) -> io::Result<()> {
    write!(out, "\x1b[{}F\x1b[J", frame_height(engine.grid().size()))?;

    draw_board(out, engine, message)
}

/// Puts the terminal into non-canonical, no-echo mode until dropped.
///
/// Reads return after at most `READ_TIMEOUT_DECISECONDS` with zero bytes if no key was pressed.
pub struct RawMode {
    fd: RawFd,
    original: libc::termios,
}

impl RawMode {
    pub fn enable(fd: &impl AsRawFd, out: &mut impl Write) -> io::Result<Self> {
        let fd = fd.as_raw_fd();
        let mut termios = MaybeUninit::uninit();

        let original = unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }

            termios.assume_init()
        };

        let mut raw: libc::termios = original;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;

        unsafe {
            if libc::tcsetattr(fd, libc::TCSADRAIN, &raw) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        out.write_all(b"\x1b[?25l")?;

        Ok(Self { fd, original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSADRAIN, &self.original);
        }

        print!("\x1b[?25h");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_span_every_column() {
        assert_eq!(rule(2, "┏", "┳", "┓"), "┏━━━━━━━┳━━━━━━━┓");
        assert_eq!(rule(1, "┗", "┻", "┛"), "┗━━━━━━━┛");
    }

    #[test]
    fn colours_cycle_by_exponent() {
        assert_eq!(cell_colour(0), None);
        assert_eq!(cell_colour(2), Some(90));
        assert_eq!(cell_colour(4), Some(33));
        assert_eq!(cell_colour(256), Some(90));
    }

    #[test]
    fn grid_takes_frame_height_minus_two_lines() {
        let grid = Grid::from_rows(&[[2u64, 0, 0], [0, 2048, 0], [0, 0, 4]]).unwrap();
        let mut out = Vec::new();

        draw_grid(&mut out, &grid).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), frame_height(3) - 2);
        assert!(text.contains(" 2048  "));
    }

    #[test]
    fn messages_follow_status() {
        assert_eq!(Message::for_status(GameStatus::InProgress, 2048), Message::Playing);
        assert_eq!(
            Message::for_status(GameStatus::Won, 512).to_string(),
            "YOU REACHED 512! PRESS R TO RESTART, Q TO QUIT."
        );
        assert_eq!(
            Message::for_status(GameStatus::Lost, 2048).to_string(),
            "GAME OVER. PRESS R TO RESTART."
        );
    }
}
