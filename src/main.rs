//! `rebat` — print the lines of a file that match a pattern, with the
//! matched span highlighted.
//!
//! The matching itself lives in the `regex_backtrack` library; this
//! binary is the line scanner around it: argument handling, bounded
//! line reading, and span rendering.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::process;

use bstr::ByteSlice;

use regex_backtrack::{search_with, validate, Match, StarPolicy};

/// Default cap on line length, in bytes.  Matching cost and recursion
/// depth grow with the text length, so unbounded lines are refused
/// rather than silently truncated.
const DEFAULT_MAX_LINE_LEN: usize = 8192;

fn print_usage() {
    eprintln!(
        "\
Usage: rebat [OPTIONS] <PATTERN> <FILE>

Prints the lines of FILE in which PATTERN matches, highlighting the
matched span.  FILE may be '-' to read standard input.

Pattern syntax: literals, '.' (any byte), '^'/'$' anchors, and the
'*'/'+'/'?' quantifiers on the preceding literal or '.'.

Options:
  --strict               Reject malformed patterns instead of treating
                         stray quantifiers and anchors as literals
  --shortest             Resolve '*'/'+' with the shortest match instead
                         of the default longest (greedy) match
  --max-line-len <N>     Refuse lines longer than N bytes (default: 8192)
  --no-color             Do not colorize the matched span
  -h, --help             Print this help message

Exit status: 0 if any line matched, 1 if none did, 2 on error."
    );
}

struct Options {
    pattern: String,
    file: String,
    policy: StarPolicy,
    strict: bool,
    max_line_len: usize,
    color: bool,
}

/// Whether an argument token is an option rather than a positional.
/// The lone `-` is the stdin sentinel, not an option.
fn is_option(arg: &str) -> bool {
    arg.starts_with('-') && arg != "-"
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        process::exit(2);
    }

    let mut policy = StarPolicy::Longest;
    let mut strict = false;
    let mut max_line_len = DEFAULT_MAX_LINE_LEN;
    let mut color = true;
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "--strict" => {
                strict = true;
            }
            "--shortest" => {
                policy = StarPolicy::Shortest;
            }
            "--no-color" => {
                color = false;
            }
            "--max-line-len" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --max-line-len requires a value");
                    process::exit(2);
                }
                max_line_len = args[i].parse::<usize>().unwrap_or_else(|_| {
                    eprintln!("error: --max-line-len must be a positive integer");
                    process::exit(2);
                });
                if max_line_len == 0 {
                    eprintln!("error: --max-line-len must be > 0");
                    process::exit(2);
                }
            }
            other if is_option(other) => {
                eprintln!("error: unknown option: {other}");
                print_usage();
                process::exit(2);
            }
            _ => {
                positional.push(args[i].clone());
            }
        }
        i += 1;
    }

    if positional.len() != 2 {
        print_usage();
        process::exit(2);
    }
    let file = positional.pop().unwrap_or_default();
    let pattern = positional.pop().unwrap_or_default();

    Options { pattern, file, policy, strict, max_line_len, color }
}

/// Write one matched line with the span highlighted in red.
///
/// The line is emitted byte-for-byte; only the matched span goes
/// through lossy display so the color codes can wrap it.  A zero-width
/// match prints the line unhighlighted.
fn print_match(out: &mut impl Write, line: &[u8], matched: Match, color: bool) -> io::Result<()> {
    // Kept out of the top-level imports: yansi's blanket `Paint` trait
    // adds `clear(&self)` to every type, which would shadow
    // `Vec::clear(&mut self)` on the line buffer in `scan_lines`.
    use yansi::Paint;

    let (head, rest) = line.split_at(matched.start);
    let (hit, tail) = rest.split_at(matched.len);
    out.write_all(head)?;
    if color && !hit.is_empty() {
        write!(out, "{}", hit.as_bstr().red())?;
    } else {
        out.write_all(hit)?;
    }
    out.write_all(tail)?;
    out.write_all(b"\n")
}

/// Scan `reader` line by line, printing every line the pattern
/// matches.  Returns whether any line matched.
///
/// Each line is matched without its `\n` (or `\r\n`) terminator, so
/// `$` anchors at the logical end of the line.  A line longer than
/// `max_line_len` aborts the scan with an error; the reader is bounded
/// per line so an oversized line is detected without buffering it
/// whole.
fn scan_lines(
    options: &Options,
    reader: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    let pattern = options.pattern.as_bytes();
    let mut line = Vec::with_capacity(256);
    let mut lineno = 0usize;
    let mut matched_any = false;

    loop {
        line.clear();
        // +2 leaves room for the terminator while still reading enough
        // past the cap to distinguish "at the limit" from "over it".
        let limit = options.max_line_len as u64 + 2;
        let n = reader.by_ref().take(limit).read_until(b'\n', &mut line)?;
        if n == 0 {
            break;
        }
        lineno += 1;

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        if line.len() > options.max_line_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "line {} exceeds the maximum line length of {} bytes",
                    lineno, options.max_line_len
                ),
            ));
        }

        if let Some(matched) = search_with(pattern, &line, options.policy) {
            matched_any = true;
            print_match(out, &line, matched, options.color)?;
        }
    }

    Ok(matched_any)
}

fn main() {
    let options = parse_args();

    if options.strict {
        if let Err(err) = validate(options.pattern.as_bytes()) {
            eprintln!("error: invalid pattern: {err}");
            process::exit(2);
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = if options.file == "-" {
        scan_lines(&options, &mut io::stdin().lock(), &mut out)
    } else {
        let file = File::open(&options.file).unwrap_or_else(|err| {
            eprintln!("error: cannot open '{}': {err}", options.file);
            process::exit(2);
        });
        scan_lines(&options, &mut BufReader::new(file), &mut out)
    };

    let matched_any = result.unwrap_or_else(|err| {
        eprintln!("error: {err}");
        process::exit(2);
    });
    if let Err(err) = out.flush() {
        eprintln!("error: {err}");
        process::exit(2);
    }

    process::exit(if matched_any { 0 } else { 1 });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
