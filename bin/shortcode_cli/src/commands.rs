use std::fmt::Write as _;
use std::io::Write;

use anyhow::{bail, Context};
use hashbrown::HashSet;
use shortcode::{Error, ShortCodec};

use crate::cli::{Command, DecodeCommand, EncodeCommand, VerifyCommand};

/// Largest modulus tracked with a dense bitmap, 512MiB at most
const MAX_BITMAP_MODULUS: u64 = 1 << 32;
/// Largest range tracked with a hash set when the modulus is too large for a bitmap
const MAX_SPARSE_COUNT: u64 = 1 << 24;

pub fn run(codec: &ShortCodec, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Encode(cmd) => encode(codec, cmd, out),
        Command::Decode(cmd) => decode(codec, cmd, out),
        Command::Verify(cmd) => verify(codec, cmd, out),
        Command::Info(_) => info(codec, out),
    }
}

fn encode(codec: &ShortCodec, cmd: &EncodeCommand, out: &mut impl Write) -> anyhow::Result<()> {
    for &counter in &cmd.counters {
        let code = u64::try_from(counter)
            .map_err(|_| Error::OutOfRange {
                counter,
                capacity: codec.capacity(),
            })
            .and_then(|c| codec.encode(c))
            .with_context(|| format!("Failed to encode {counter}"))?;

        writeln!(out, "{code}")?;
    }

    Ok(())
}

fn decode(codec: &ShortCodec, cmd: &DecodeCommand, out: &mut impl Write) -> anyhow::Result<()> {
    for code in &cmd.codes {
        let counter = codec.decode(code).with_context(|| format!("Failed to decode {code:?}"))?;

        writeln!(out, "{counter}")?;
    }

    Ok(())
}

/// Scrambled values already produced
enum Seen {
    Bitmap(Vec<u64>),
    Sparse(HashSet<u64>),
}

impl Seen {
    fn new(modulus: u64, count: u64) -> anyhow::Result<Seen> {
        if modulus <= MAX_BITMAP_MODULUS {
            return Ok(Seen::Bitmap(vec![0; modulus.div_ceil(64) as usize]));
        }

        if count > MAX_SPARSE_COUNT {
            bail!("Cannot track {count} codes for modulus {modulus}, pass --count of at most {MAX_SPARSE_COUNT}");
        }

        Ok(Seen::Sparse(HashSet::with_capacity(count as usize)))
    }

    /// Returns false if `value` was already present
    fn insert(&mut self, value: u64) -> bool {
        match self {
            Seen::Bitmap(bits) => {
                let (word, bit) = ((value / 64) as usize, value % 64);
                let fresh = bits[word] & (1 << bit) == 0;
                bits[word] |= 1 << bit;
                fresh
            }
            Seen::Sparse(set) => set.insert(value),
        }
    }
}

fn verify(codec: &ShortCodec, cmd: &VerifyCommand, out: &mut impl Write) -> anyhow::Result<()> {
    let capacity = codec.capacity();

    if cmd.start >= capacity {
        bail!("Start {} is outside the domain [0, {capacity})", cmd.start);
    }

    let count = cmd.count.unwrap_or(capacity).min(capacity - cmd.start);
    let end = cmd.start + count;

    log::info!("Verifying {count} counters in [{}, {end})", cmd.start);

    let mut seen = Seen::new(codec.modulus(), count)?;
    let progress = (count / 10).max(1);

    for counter in cmd.start..end {
        let value = codec.group().scramble(counter)?;
        let code = codec.radix().to_string(value as u128)?;

        if code.len() != codec.width() {
            bail!("Counter {counter} encoded as {code:?}, expected {} symbols", codec.width());
        }

        let decoded = codec.decode(&code).with_context(|| format!("Failed to decode {code:?} from {counter}"))?;

        if decoded != counter {
            bail!("Counter {counter} encoded as {code:?} but decoded as {decoded}");
        }

        if !seen.insert(value) {
            bail!("Counter {counter} collides on code {code:?}");
        }

        let done = counter - cmd.start + 1;
        if done % progress == 0 {
            log::info!("Verified {done}/{count}");
        }
    }

    writeln!(out, "verified {count} counters in [{}, {end}), no collisions", cmd.start)?;

    Ok(())
}

fn info(codec: &ShortCodec, out: &mut impl Write) -> anyhow::Result<()> {
    let mut factors = String::new();
    for (i, (q, e)) in codec.group().factors().enumerate() {
        if i > 0 {
            factors.push_str(" * ");
        }
        match e {
            1 => write!(factors, "{q}")?,
            _ => write!(factors, "{q}^{e}")?,
        }
    }

    writeln!(out, "modulus: {}", codec.modulus())?;
    writeln!(out, "generator: {}", codec.generator())?;
    writeln!(out, "offset: {}", codec.offset())?;
    writeln!(out, "capacity: {}", codec.capacity())?;
    writeln!(out, "group order: {factors}")?;
    writeln!(out, "table entries: {}", codec.group().table_entries())?;
    writeln!(out, "alphabet: {}", codec.alphabet().as_str())?;
    writeln!(out, "case insensitive: {}", codec.alphabet().case_insensitive())?;
    writeln!(out, "width: {}", codec.width())?;
    writeln!(out, "code space: {}", codec.radix().capacity())?;

    Ok(())
}
