//! Interactive terminal loop driving a [`TttApi`], local or remote.

use std::io::{BufRead, Write};

use log::debug;

use crate::{
    common::{MoveResult, Outcome, Player},
    config::BOARD_SIZE,
    protocol::{RpcError, TttApi},
};

/// What the client does once connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Take turns entering moves for both players.
    Play,
    /// Block until someone else finishes the match.
    Wait,
}

/// Read one integer, re-prompting on anything unparsable. End of input is
/// an error so a closed stdin cannot spin the loop.
fn read_number<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<i64> {
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(anyhow::anyhow!("input closed"));
        }
        match line.trim().parse::<i64>() {
            Ok(n) => return Ok(n),
            Err(_) => {
                write!(out, "Please enter a number: ")?;
                out.flush()?;
            }
        }
    }
}

fn select_mode<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<Mode> {
    loop {
        write!(out, "Type 1 for playing mode or 0 for wait-for-winner mode: ")?;
        out.flush()?;
        match read_number(input, out)? {
            1 => return Ok(Mode::Play),
            0 => return Ok(Mode::Wait),
            other => writeln!(out, "Unknown mode {}.", other)?,
        }
    }
}

/// Translate a 1-9 square number to wire coordinates. Numbers outside 1-9
/// still produce coordinates; the server decides they are off the board.
fn square_to_wire(square: i64) -> (i32, i32) {
    let idx = square.saturating_sub(1);
    let size = BOARD_SIZE as i64;
    let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    (clamp(idx / size), clamp(idx % size))
}

/// Text shown for a rejected move.
pub fn describe_rejection(result: MoveResult) -> String {
    format!("{} Try again...", result)
}

/// Text shown when the match is over.
pub fn describe_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Draw => "How boring, it is a draw".to_string(),
        Outcome::Winner(p) => format!("Congratulations, player {}, YOU ARE THE WINNER!", p),
        Outcome::Undecided => "The game is still in progress".to_string(),
    }
}

async fn play_until_decided<A, R, W>(api: &A, input: &mut R, out: &mut W) -> anyhow::Result<Outcome>
where
    A: TttApi + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut player = Player::A;
    loop {
        loop {
            writeln!(out, "{}", api.current_board().await?)?;
            write!(
                out,
                "Player {}, please enter the number of the square where you want to place your {} (or 0 to refresh the board): ",
                player,
                player.mark()
            )?;
            out.flush()?;
            let square = read_number(input, out)?;
            debug!("square = {}", square);
            if square == 0 {
                continue;
            }
            let (row, column) = square_to_wire(square);
            debug!("row = {}, column = {}", row, column);
            match api.play(row, column, player.code()).await {
                Ok(MoveResult::Success) => break,
                Ok(MoveResult::GameFinished) => {
                    writeln!(out, "{}", MoveResult::GameFinished)?;
                    // Someone else ended the match; there is nothing left to play.
                    let outcome = api.check_winner().await?;
                    if outcome.is_decided() {
                        return Ok(outcome);
                    }
                }
                Ok(rejected) => writeln!(out, "{}", describe_rejection(rejected))?,
                Err(RpcError::InvalidArgument(description)) => {
                    writeln!(out, "{}. Try again...", description)?
                }
                Err(e) => return Err(e.into()),
            }
        }

        let outcome = api.check_winner().await?;
        player = player.other();
        debug!("next player {}", player);
        if outcome.is_decided() {
            return Ok(outcome);
        }
    }
}

/// Run one client session and return the final outcome.
///
/// With `mode` unset the user is asked which mode to use.
pub async fn run_client<A, R, W>(
    api: &A,
    mode: Option<Mode>,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<Outcome>
where
    A: TttApi + ?Sized,
    R: BufRead,
    W: Write,
{
    let mode = match mode {
        Some(m) => m,
        None => select_mode(input, out)?,
    };
    let outcome = match mode {
        Mode::Play => play_until_decided(api, input, out).await?,
        Mode::Wait => {
            writeln!(out, "Waiting for winner...")?;
            out.flush()?;
            api.wait_for_winner().await?
        }
    };

    writeln!(out, "{}", api.current_board().await?)?;
    writeln!(out)?;
    writeln!(out, "{}", describe_outcome(outcome))?;
    out.flush()?;
    Ok(outcome)
}
