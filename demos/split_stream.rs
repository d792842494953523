use fallible_iterator::FallibleIterator;
use std::env;
use std::fs::File;

use sql_splitter::{Dialect, SqlSplitter};

/// Stream statements out of the specified files and print them.
fn main() {
    env_logger::init();
    let mut args = env::args().skip(1);
    let dialect = match args.next().as_deref() {
        Some("mysql") => Dialect::MySql,
        Some("oracle") => Dialect::Oracle,
        Some(other) => {
            eprintln!("unknown dialect: {other}");
            return;
        }
        None => {
            eprintln!("usage: split_stream <mysql|oracle> <file>...");
            return;
        }
    };
    for arg in args {
        println!("{arg}");
        let f = match File::open(&arg) {
            Ok(f) => f,
            Err(err) => {
                eprintln!("Err: {err} in {arg}");
                continue;
            }
        };
        let splitter = match SqlSplitter::new(dialect) {
            Ok(splitter) => splitter,
            Err(err) => {
                eprintln!("Err: {err}");
                return;
            }
        };
        let mut stmts = splitter.iterate(f);
        loop {
            match stmts.next() {
                Ok(None) => break,
                Err(err) => {
                    eprintln!("Err: {err} in {arg}");
                    break;
                }
                Ok(Some(stmt)) => println!("{}: {stmt}", stmt.offset()),
            }
        }
        println!("{} bytes", stmts.iterated_bytes());
    }
}
