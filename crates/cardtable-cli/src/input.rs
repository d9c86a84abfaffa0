//! Console-driven card choice for interactive players.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Arc;

use cardtable_core::model::player::{CardChooser, ChoiceError, ChoiceRequest};
use parking_lot::Mutex;
use rand::RngCore;

use crate::view::{CardFace, Presenter};

/// Line source shared by every interactive player at one table.
pub type SharedInput<R> = Arc<Mutex<R>>;

/// Asks a human for a card number until a valid one is typed.
pub struct ConsoleChooser<R, W> {
    input: SharedInput<R>,
    output: W,
    faces: CardFace,
}

impl ConsoleChooser<BufReader<Stdin>, Stdout> {
    /// One buffered console reader; clone it into each interactive chooser.
    pub fn stdin_reader() -> SharedInput<BufReader<Stdin>> {
        Arc::new(Mutex::new(BufReader::new(io::stdin())))
    }

    pub fn stdio(input: SharedInput<BufReader<Stdin>>) -> Self {
        Self::shared(input, io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self::shared(Arc::new(Mutex::new(input)), output)
    }

    /// The reader is locked only while a line is read.
    pub fn shared(input: SharedInput<R>, output: W) -> Self {
        Self {
            input,
            output,
            faces: CardFace,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, request: &ChoiceRequest<'_>) -> io::Result<()> {
        writeln!(self.output, "{}, choose a card to play:", request.player)?;
        for (number, card) in request.choices.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", number + 1, self.faces.render(card))?;
        }
        write!(self.output, "> ")?;
        self.output.flush()
    }
}

/// Parses a one-based card number, accepting `1..=len` only.
fn parse_choice(line: &str, len: usize) -> Option<usize> {
    let number: usize = line.trim().parse().ok()?;
    (1..=len).contains(&number).then(|| number - 1)
}

impl<R: BufRead, W: Write> CardChooser for ConsoleChooser<R, W> {
    fn choose(
        &mut self,
        request: &ChoiceRequest<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<usize, ChoiceError> {
        let len = request.choices.len();
        if len == 0 {
            return Err(ChoiceError::OutOfRange { index: 0, len });
        }

        let mut line = String::new();
        loop {
            self.prompt(request)?;
            line.clear();
            let read = self.input.lock().read_line(&mut line)?;
            if read == 0 {
                return Err(ChoiceError::InputClosed);
            }
            match parse_choice(&line, len) {
                Some(index) => return Ok(index),
                None => writeln!(
                    self.output,
                    "'{}' is not a valid choice, enter a number from 1 to {len}.",
                    line.trim()
                )?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsoleChooser, parse_choice};
    use cardtable_core::model::card::Card;
    use cardtable_core::model::player::{CardChooser, ChoiceError, ChoiceRequest, Seat};
    use cardtable_core::model::rank::Rank;
    use cardtable_core::model::suit::Suit;
    use parking_lot::Mutex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Cursor;
    use std::sync::Arc;

    fn five_cards() -> Vec<Card> {
        [Rank::Ace, Rank::Seven, Rank::Eight, Rank::Jack, Rank::King]
            .into_iter()
            .map(|rank| Card::new(Suit::Hearts, rank))
            .collect()
    }

    fn choose_with(input: &str, cards: &[Card]) -> (Result<usize, ChoiceError>, String) {
        let mut chooser = ConsoleChooser::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let request = ChoiceRequest {
            seat: Seat::new(0),
            player: "you",
            choices: cards,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let result = chooser.choose(&request, &mut rng);
        let output = String::from_utf8(chooser.into_output()).expect("utf8 output");
        (result, output)
    }

    #[test]
    fn invalid_entries_reprompt_until_a_valid_number() {
        let cards = five_cards();
        let (result, output) = choose_with("x\n9\n0\n3\n", &cards);
        assert_eq!(result.unwrap(), 2);
        assert_eq!(output.matches("not a valid choice").count(), 3);
        assert_eq!(output.matches("choose a card").count(), 4);
    }

    #[test]
    fn prompt_lists_cards_from_one() {
        let cards = five_cards();
        let (_, output) = choose_with("1\n", &cards);
        assert!(output.contains(" 1) AH"));
        assert!(output.contains(" 5) KH"));
    }

    #[test]
    fn upper_bound_follows_hand_size() {
        let cards = five_cards();
        let (result, _) = choose_with("8\n", &cards[..2]);
        assert!(matches!(result, Err(ChoiceError::InputClosed)));
        let (result, _) = choose_with("2\n", &cards[..2]);
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn closed_input_is_reported() {
        let cards = five_cards();
        let (result, _) = choose_with("", &cards);
        assert!(matches!(result, Err(ChoiceError::InputClosed)));
    }

    #[test]
    fn choosers_take_turns_on_one_reader() {
        let cards = five_cards();
        let input = Arc::new(Mutex::new(Cursor::new(b"1\n2\n".to_vec())));
        let mut first = ConsoleChooser::shared(Arc::clone(&input), Vec::new());
        let mut second = ConsoleChooser::shared(Arc::clone(&input), Vec::new());
        let request = ChoiceRequest {
            seat: Seat::new(0),
            player: "you",
            choices: &cards,
        };
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(first.choose(&request, &mut rng).unwrap(), 0);
        assert_eq!(second.choose(&request, &mut rng).unwrap(), 1);
        assert!(matches!(
            first.choose(&request, &mut rng),
            Err(ChoiceError::InputClosed)
        ));
    }

    #[test]
    fn parse_choice_trims_whitespace() {
        assert_eq!(parse_choice("  4 \r\n", 5), Some(3));
        assert_eq!(parse_choice("-1", 5), None);
        assert_eq!(parse_choice("", 5), None);
    }
}
