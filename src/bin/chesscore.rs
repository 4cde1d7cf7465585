// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use std::io::{self, Read};
use std::process;
use std::time::Instant;

use chesscore::notation::START_NOTATION;
use chesscore::script::{self, ScriptError};
use chesscore::{divide, perft, Board, GameState, Outcome, Position};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("perft")
                .about("Counts move paths from a board position")
                .arg(
                    Arg::with_name("NOTATION")
                        .help("Board notation for the starting position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to walk")
                        .value_name("DEPTH")
                        .short("d")
                        .long("depth")
                        .takes_value(true)
                        .default_value("3"),
                )
                .arg(
                    Arg::with_name("divide")
                        .help("Print the count below each root move")
                        .long("divide"),
                ),
        )
        .subcommand(
            SubCommand::with_name("moves")
                .about("Lists the legal moves of the piece on a square")
                .arg(
                    Arg::with_name("NOTATION")
                        .help("Board notation")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("SQUARE")
                        .help("Square holding the piece, e.g. e2")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::with_name("json")
                        .help("Print the moves as a JSON array")
                        .long("json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Plays coordinate moves and prints the resulting board")
                .arg(
                    Arg::with_name("from")
                        .help("Board notation to start from")
                        .value_name("NOTATION")
                        .long("from")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("MOVES")
                        .help("Moves such as e2e4 or e7e8q; read from stdin when absent")
                        .multiple(true)
                        .index(1),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("moves", Some(matches)) => run_moves(matches),
        ("play", Some(matches)) => run_play(matches),
        _ => unreachable!("clap requires a subcommand"),
    };

    if let Err(message) = result {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}

fn load(notation: &str) -> Result<Board, String> {
    Board::from_notation(notation).map_err(|err| format!("invalid notation: {}", err))
}

fn run_perft(matches: &ArgMatches) -> Result<(), String> {
    let notation = matches.value_of("NOTATION").unwrap_or(START_NOTATION);
    let depth = value_t_or_exit!(matches, "depth", u32);
    let board = load(notation)?;

    println!("notation: {}", notation);
    println!("depth:    {}", depth);
    println!();
    println!("{}", board);
    if matches.is_present("divide") {
        let mut total = 0;
        for (mov, count) in divide(&board, depth) {
            println!("{}: {}", mov, count);
            total += count;
        }
        println!();
        println!("total: {}", total);
        return Ok(());
    }

    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&board, i);
        let duration = start.elapsed();
        println!(
            "perft({}) = {} ({} ms)",
            i,
            results,
            duration.as_secs() * 1000 + u64::from(duration.subsec_millis())
        );
    }

    Ok(())
}

fn run_moves(matches: &ArgMatches) -> Result<(), String> {
    let mut board = load(matches.value_of("NOTATION").unwrap_or(START_NOTATION))?;
    let square = matches.value_of("SQUARE").unwrap_or_default();
    let from: Position = square
        .parse()
        .map_err(|err| format!("invalid square '{}': {}", square, err))?;

    let targets: Vec<Position> = board.legal_moves(from).into_iter().collect();
    if matches.is_present("json") {
        let json = serde_json::to_string(&targets).map_err(|err| err.to_string())?;
        println!("{}", json);
    } else {
        let names: Vec<String> = targets.iter().map(|sq| sq.to_string()).collect();
        println!("{}", names.join(" "));
    }

    Ok(())
}

fn run_play(matches: &ArgMatches) -> Result<(), String> {
    let mut board = load(matches.value_of("from").unwrap_or(START_NOTATION))?;
    let text = match matches.values_of("MOVES") {
        Some(moves) => moves.collect::<Vec<_>>().join(" "),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| err.to_string())?;
            buf
        }
    };

    let moves = script::parse_moves(&text).map_err(|err| err.to_string())?;
    info!("replaying {} moves", moves.len());
    let replayed = script::replay(&mut board, &moves);

    println!("{}", board);
    println!("{}", board.to_notation());
    match board.state() {
        GameState::Active => println!("{:?} to move", board.side_to_move()),
        GameState::AwaitingPromotion { side, square } => {
            println!("{:?} must choose a promotion piece on {}", side, square)
        }
        GameState::Finished(Outcome::Checkmate { winner }) => {
            println!("checkmate, {:?} wins", winner)
        }
        GameState::Finished(Outcome::Stalemate) => println!("stalemate"),
    }

    replayed.map_err(|err: ScriptError| err.to_string())
}
