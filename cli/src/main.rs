use std::fs;
use std::fs::File;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{App, Arg};

use tpu::machine::Machine;

const VERSION: &str = "0.1";

fn main() {
    let matches = App::new("tpu")
        .version(VERSION)
        .arg(
            Arg::with_name("INPUT")
                .help("image file to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("trace")
                .long("trace")
                .takes_value(true)
                .help("write a per-instruction execution trace to FILE"),
        )
        .arg(
            Arg::with_name("max-instructions")
                .long("max-instructions")
                .takes_value(true)
                .help("stop after N instructions instead of running to halt"),
        )
        .get_matches();

    let filename = matches.value_of("INPUT").unwrap();
    let image = match fs::read(filename) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("error reading {}: {}", filename, e);
            process::exit(1);
        }
    };

    let mut machine = Machine::new();
    if let Err(e) = machine.load_image(&image) {
        eprintln!("error loading image: {}", e);
        process::exit(1);
    }

    if let Some(path) = matches.value_of("trace") {
        match File::create(path) {
            Ok(f) => machine.write_trace_to(Box::new(f)),
            Err(e) => {
                eprintln!("error opening trace file {}: {}", path, e);
                process::exit(1);
            }
        }
    }

    let max_instructions = matches.value_of("max-instructions").map(|s| {
        s.parse::<usize>().unwrap_or_else(|_| {
            eprintln!("--max-instructions expects a non-negative integer, got {:?}", s);
            process::exit(1);
        })
    });

    let keep_running = Arc::new(AtomicBool::new(true));
    {
        let keep_running = Arc::clone(&keep_running);
        // mirrors the teacher's interrupt handling in its interactive tools:
        // a Ctrl-C clears the flag instead of killing the process outright,
        // so the dispatch loop gets to stop between instructions and still
        // print a register dump.
        ctrlc::set_handler(move || {
            keep_running.store(false, Ordering::SeqCst);
        })
        .expect("failed to install SIGINT/SIGTERM handler");
    }

    let result = machine.run(&keep_running, max_instructions);

    println!("{}", machine.dump_regs());

    match result {
        Ok(()) => process::exit(0),
        Err(fault) => {
            eprintln!("fault: {}", fault);
            process::exit(0);
        }
    }
}
