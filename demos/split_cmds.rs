use std::env;
use std::fs;

use sql_splitter::{Dialect, SqlSplitter};

/// Split the specified files and print all statements.
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
            eprintln!("usage: split_cmds <mysql|oracle> <file>...");
            return;
        }
    };
    let mut splitter = match SqlSplitter::new(dialect) {
        Ok(splitter) => splitter,
        Err(err) => {
            eprintln!("Err: {err}");
            return;
        }
    };
    for arg in args {
        println!("{arg}");
        let script = match fs::read_to_string(&arg) {
            Ok(script) => script,
            Err(err) => {
                eprintln!("Err: {err} in {arg}");
                continue;
            }
        };
        for stmt in splitter.split(&script) {
            println!("{}: {stmt}", stmt.offset());
        }
    }
}
