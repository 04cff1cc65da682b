//! Caller-owned cache of renderings for one input buffer.
//!
//! A [`ConversionCache`] remembers the text produced for each [`Format`] of
//! the buffer it was last asked about. Handing it a different buffer drops
//! every entry before anything is rendered, so stale output for a previous
//! input can never be returned.

use crate::encoder::Encoder;
use crate::format::Format;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Identity of an input buffer: its length and blake3 digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InputId {
    len: usize,
    digest: blake3::Hash,
}

impl InputId {
    fn of(data: &[u8]) -> Self {
        Self {
            len: data.len(),
            digest: blake3::hash(data),
        }
    }
}

/// Lookup statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that had to render
    pub misses: usize,
    /// Times the cache was dropped because the input changed
    pub invalidations: usize,
}

/// Mapping from format to rendered text, bound to a single input
#[derive(Debug, Clone)]
pub struct ConversionCache {
    encoder: Encoder,
    input: Option<InputId>,
    entries: BTreeMap<Format, String>,
    stats: CacheStats,
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new(Encoder::new())
    }
}

impl ConversionCache {
    /// Creates an empty cache rendering with `encoder`
    pub fn new(encoder: Encoder) -> Self {
        Self {
            encoder,
            input: None,
            entries: BTreeMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Returns the rendering of `data` as `format`, computing it on a miss
    pub fn get_or_encode(&mut self, data: &[u8], format: Format) -> &str {
        self.bind(data);
        if self.entries.contains_key(&format) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
            trace!("Cache miss for {}", format);
            let text = self.encoder.encode(data, format);
            self.entries.insert(format, text);
        }
        &self.entries[&format]
    }

    /// Renders every format of `data` that isn't cached yet
    pub fn populate(&mut self, data: &[u8]) -> &BTreeMap<Format, String> {
        for format in Format::ALL {
            self.get_or_encode(data, format);
        }
        &self.entries
    }

    /// Returns a cached rendering for the bound input
    pub fn get(&self, format: Format) -> Option<&str> {
        self.entries.get(&format).map(String::as_str)
    }

    /// Returns every cached rendering for the bound input
    pub fn entries(&self) -> &BTreeMap<Format, String> {
        &self.entries
    }

    /// Returns true if the cache is bound to exactly these bytes
    pub fn is_current_for(&self, data: &[u8]) -> bool {
        self.input == Some(InputId::of(data))
    }

    /// Drops every entry and unbinds the input
    pub fn invalidate(&mut self) {
        if self.input.take().is_some() || !self.entries.is_empty() {
            self.stats.invalidations += 1;
        }
        self.entries.clear();
    }

    /// Number of cached renderings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns lookup statistics
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Returns the encoder used on misses
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    fn bind(&mut self, data: &[u8]) {
        let id = InputId::of(data);
        if self.input == Some(id) {
            return;
        }
        if self.input.is_some() {
            debug!("Input changed, dropping {} cached renderings", self.entries.len());
            self.invalidate();
        }
        self.input = Some(id);
    }
}
