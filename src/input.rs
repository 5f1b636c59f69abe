use aho_corasick::{AhoCorasick, BuildError, MatchKind};
use core_2048::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
    Quit,
}

#[derive(Clone, Copy)]
enum Key {
    Command(Command),
    /// Start of a CSI/SS3 sequence we don't handle.
    Introducer,
    /// Escape on its own, or the prefix of an Alt chord.
    Escape,
}

// Earlier entries win when several patterns match at the same offset, so the escape sequences
// must precede the introducers and the lone escape key.
const KEY_MAP: [(&[u8], Key); 22] = [
    (b"\x1b[A", Key::Command(Command::Move(Direction::Up))),
    (b"\x1b[B", Key::Command(Command::Move(Direction::Down))),
    (b"\x1b[C", Key::Command(Command::Move(Direction::Right))),
    (b"\x1b[D", Key::Command(Command::Move(Direction::Left))),
    (b"\x1bOA", Key::Command(Command::Move(Direction::Up))),
    (b"\x1bOB", Key::Command(Command::Move(Direction::Down))),
    (b"\x1bOC", Key::Command(Command::Move(Direction::Right))),
    (b"\x1bOD", Key::Command(Command::Move(Direction::Left))),
    (b"\x1b[", Key::Introducer),
    (b"\x1bO", Key::Introducer),
    (b"\x1b", Key::Escape),
    (b"w", Key::Command(Command::Move(Direction::Up))),
    (b"k", Key::Command(Command::Move(Direction::Up))),
    (b"s", Key::Command(Command::Move(Direction::Down))),
    (b"j", Key::Command(Command::Move(Direction::Down))),
    (b"d", Key::Command(Command::Move(Direction::Right))),
    (b"l", Key::Command(Command::Move(Direction::Right))),
    (b"a", Key::Command(Command::Move(Direction::Left))),
    (b"h", Key::Command(Command::Move(Direction::Left))),
    (b"r", Key::Command(Command::Restart)),
    (b"q", Key::Command(Command::Quit)),
    (b"\x03", Key::Command(Command::Quit)),
];

/// Turns raw terminal bytes into commands.
///
/// An escape or sequence introducer at the end of a read is held back, since the rest of the
/// sequence may arrive with the next read. Call `flush` once input goes quiet to treat a held
/// escape as the Escape key.
pub struct KeyDecoder {
    searcher: AhoCorasick,
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Result<Self, BuildError> {
        let searcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(KEY_MAP.iter().map(|&(pattern, _)| pattern))?;

        Ok(Self {
            searcher,
            pending: Vec::new(),
        })
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Command> {
        self.pending.extend_from_slice(bytes);

        let mut commands = Vec::new();
        let mut pos = 0;
        let mut complete = self.pending.len();

        while let Some(m) = self.searcher.find(&self.pending[pos..]) {
            let (start, end) = (pos + m.start(), pos + m.end());

            match KEY_MAP[m.pattern().as_usize()].1 {
                Key::Escape | Key::Introducer if end == self.pending.len() => {
                    complete = start;
                    break;
                }
                // Alt chord: drop the key that follows the escape.
                Key::Escape => {
                    pos = end + 1;
                    continue;
                }
                Key::Introducer => {}
                Key::Command(command) => commands.push(command),
            }

            pos = end;
        }

        self.pending.drain(..complete);

        commands
    }

    /// Resolves input held back by `feed` once no more bytes are coming.
    pub fn flush(&mut self) -> Vec<Command> {
        let escape = self.pending == b"\x1b";
        self.pending.clear();

        if escape {
            vec![Command::Quit]
        } else {
            Vec::new()
        }
    }
}
