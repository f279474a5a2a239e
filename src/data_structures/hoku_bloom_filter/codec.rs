// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Binary persistence format.
//!
//! All fields are big-endian and written in this order:
//!
//! | field               | width          |
//! |---------------------|----------------|
//! | version             | 2 bytes        |
//! | hash count          | 1 byte         |
//! | hash function id    | 1 byte         |
//! | false positive rate | 4 bytes (f32)  |
//! | defined capacity    | 4 bytes        |
//! | current count       | 4 bytes        |
//! | word count          | 4 bytes        |
//! | words               | 4 bytes each   |
//!
//! The bit capacity is not stored; it is `word count * 32`. There is no
//! checksum, a damaged stream is only detected when a read runs short.

use std::io::{BufWriter, Read, Write};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::data_structures::hoku_bloom_filter::error::{HokuBloomFilterError, Result};
use crate::data_structures::hoku_bloom_filter::params::{
    FilterParameters, MAX_ITEM_COUNT, MAX_WORD_COUNT, WORD_BYTES,
};

/// Version tag written by this implementation.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the fixed header preceding the words.
pub const HEADER_BYTES: usize = 20;

/// Words decoded per read call.
const READ_CHUNK_WORDS: usize = 16 * 1024;

/// Everything a persisted filter carries.
#[derive(Debug)]
pub(crate) struct FilterState {
    pub params: FilterParameters,
    pub words: Vec<u32>,
    pub current_count: u64,
}

/// Write a filter in the current format version.
pub(crate) fn encode<W: Write>(
    writer: W,
    params: &FilterParameters,
    words: &[u32],
    current_count: u64,
) -> Result<()> {
    let current_count = u32::try_from(current_count)
        .ok()
        .filter(|&count| count <= MAX_ITEM_COUNT)
        .ok_or_else(|| {
            HokuBloomFilterError::invalid_data(format!(
                "current count {current_count} does not fit the signed 32-bit count field"
            ))
        })?;
    let word_count = u32::try_from(words.len())
        .ok()
        .filter(|&count| count as usize <= MAX_WORD_COUNT)
        .ok_or_else(|| {
            HokuBloomFilterError::invalid_data(format!("{} words cannot be persisted", words.len()))
        })?;

    let mut writer = BufWriter::new(writer);
    writer.write_u16::<BigEndian>(FORMAT_VERSION)?;
    writer.write_u8(params.hash_count())?;
    writer.write_u8(params.hash_function_id())?;
    writer.write_f32::<BigEndian>(params.false_positive_rate())?;
    writer.write_u32::<BigEndian>(params.defined_capacity())?;
    writer.write_u32::<BigEndian>(current_count)?;
    writer.write_u32::<BigEndian>(word_count)?;
    for &word in words {
        writer.write_u32::<BigEndian>(word)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a filter, dispatching on its version tag.
pub(crate) fn decode<R: Read>(mut reader: R) -> Result<FilterState> {
    match reader.read_u16::<BigEndian>()? {
        1 => decode_v1(reader),
        other => Err(HokuBloomFilterError::invalid_data(format!(
            "unsupported format version {other}"
        ))),
    }
}

fn decode_v1<R: Read>(mut reader: R) -> Result<FilterState> {
    let hash_count = reader.read_u8()?;
    let hash_function_id = reader.read_u8()?;
    let false_positive_rate = reader.read_f32::<BigEndian>()?;
    let defined_capacity = reader.read_u32::<BigEndian>()?;
    let current_count = reader.read_u32::<BigEndian>()?;
    let word_count = reader.read_u32::<BigEndian>()? as usize;
    if word_count > MAX_WORD_COUNT {
        return Err(HokuBloomFilterError::invalid_data(format!(
            "word count {word_count} is out of range"
        )));
    }
    if current_count > MAX_ITEM_COUNT {
        return Err(HokuBloomFilterError::invalid_data(format!(
            "current count {current_count} is out of range"
        )));
    }

    // A header that cannot describe a usable filter is damaged data.
    let params = FilterParameters::from_parts(
        hash_count,
        hash_function_id,
        false_positive_rate,
        defined_capacity,
        word_count,
    )
    .map_err(|err| match err {
        HokuBloomFilterError::Configuration(msg) => HokuBloomFilterError::invalid_data(msg),
        other => other,
    })?;
    let words = read_words(&mut reader, word_count)?;

    Ok(FilterState {
        params,
        words,
        current_count: u64::from(current_count),
    })
}

/// Read `word_count` words without trusting the count for the allocation size.
fn read_words<R: Read>(reader: &mut R, word_count: usize) -> Result<Vec<u32>> {
    let chunk_words = word_count.min(READ_CHUNK_WORDS);
    let mut words = Vec::with_capacity(chunk_words);
    let mut buffer = vec![0u8; chunk_words * WORD_BYTES];

    let mut remaining = word_count;
    while remaining > 0 {
        let chunk = remaining.min(READ_CHUNK_WORDS);
        let bytes = &mut buffer[..chunk * WORD_BYTES];
        reader.read_exact(bytes)?;
        words.extend(bytes.chunks_exact(WORD_BYTES).map(BigEndian::read_u32));
        remaining -= chunk;
    }

    Ok(words)
}
