use std::panic;

use tagmark_core::{RenderSettings, markdown_to_rich_text, markdown_to_rich_text_with};

const CASES: usize = 200;
const MAX_LEN: usize = 256;
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 \
\n\t#*~^`[](){}<>:+-_=./\\\\\"";
const PLAIN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 \n,;:!?'";

#[test]
fn conversion_never_panics_on_random_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x7f4a_2d91_13b4_55a1);
    let html = RenderSettings::html();
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, CHARSET, len);
        let result = panic::catch_unwind(|| {
            markdown_to_rich_text(&source);
            markdown_to_rich_text_with(&source, &html);
        });
        if result.is_err() {
            return Err(format!("conversion panicked for case {}: {:?}", case, source).into());
        }
    }
    Ok(())
}

#[test]
fn output_never_gains_lines() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x91d4_2f8e_c1a3_044f);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, CHARSET, len);
        let output = markdown_to_rich_text(&source);
        if output.lines().count() > source.lines().count() {
            return Err(format!("case {} gained lines: {:?} -> {:?}", case, source, output).into());
        }
    }
    Ok(())
}

#[test]
fn text_without_indicators_is_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x1357_9bdf_2468_ace0);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, PLAIN_CHARSET, len);
        let output = markdown_to_rich_text(&source);
        if output != terminated_lines(&source) {
            return Err(format!("case {} changed plain text: {:?} -> {:?}", case, source, output).into());
        }
    }
    Ok(())
}

#[test]
fn fully_escaped_input_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x0f0f_1e1e_2d2d_3c3c);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, CHARSET, len).replace('\t', " ");
        let mut escaped = String::with_capacity(source.len() * 2);
        for ch in source.chars() {
            if !ch.is_alphanumeric() && ch != '\n' {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        let output = markdown_to_rich_text(&escaped);
        if output != terminated_lines(&source) {
            return Err(format!("case {} did not round trip: {:?} -> {:?}", case, escaped, output).into());
        }
    }
    Ok(())
}

fn terminated_lines(source: &str) -> String {
    source.lines().map(|line| format!("{}\n", line)).collect()
}

fn random_string(rng: &mut Lcg, charset: &[u8], len: usize) -> String {
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let idx = rng.gen_range(0, charset.len());
        let byte = charset.get(idx).copied().unwrap_or(b' ');
        out.push(byte as char);
    }
    out
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn gen_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = max - min;
        let value = (self.next() >> 1) as usize;
        min + (value % span)
    }
}
