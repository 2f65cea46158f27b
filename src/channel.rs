use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::engine::{lock, SharedEngine};
use crate::error::ChannelError;

/// Largest listing accepted by an import.
pub const MAX_LISTING_SIZE: usize = 1000;

/// Read/write access to the macro listing of a shared engine.
///
/// Writing replaces every slot at once. Reading yields the listing taken at
/// the first read of a session, then a single end-of-data before the next
/// session starts.
pub struct MacroChannel {
    engine: SharedEngine,
    pending: Option<(Vec<u8>, usize)>,
}

impl MacroChannel {
    pub fn new(engine: SharedEngine) -> Self {
        Self {
            engine,
            pending: None,
        }
    }

    /// Imports a listing. Returns the number of bytes consumed.
    pub fn write(&self, listing: &[u8]) -> Result<usize, ChannelError> {
        if listing.len() > MAX_LISTING_SIZE {
            log::warn!("Rejecting listing of {} bytes", listing.len());
            return Err(ChannelError::BufferTooLarge {
                len: listing.len(),
                max: MAX_LISTING_SIZE,
            });
        }
        lock(&self.engine).import(listing);
        Ok(listing.len())
    }

    /// Imports a listing copied out of `source`.
    pub fn write_from<R: Read>(&self, source: R) -> Result<usize, ChannelError> {
        let mut listing = Vec::with_capacity(MAX_LISTING_SIZE);
        source
            .take(MAX_LISTING_SIZE as u64 + 1)
            .read_to_end(&mut listing)?;
        if listing.len() > MAX_LISTING_SIZE {
            log::warn!("Rejecting listing larger than {} bytes", MAX_LISTING_SIZE);
            return Err(ChannelError::BufferTooLarge {
                len: listing.len(),
                max: MAX_LISTING_SIZE,
            });
        }
        self.write(&listing)
    }
}

impl Read for MacroChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let (listing, offset) = self
            .pending
            .get_or_insert_with(|| (lock(&self.engine).export().into_bytes(), 0));

        if *offset >= listing.len() {
            self.pending = None;
            return Ok(0);
        }

        let n = buf.len().min(listing.len() - *offset);
        buf[..n].copy_from_slice(&listing[*offset..*offset + n]);
        *offset += n;
        Ok(n)
    }
}

/// Longest prefix of `listing` made of whole lines that fits in an import.
pub fn fit_listing(listing: &str) -> &str {
    if listing.len() <= MAX_LISTING_SIZE {
        return listing;
    }
    match listing[..MAX_LISTING_SIZE].rfind('\n') {
        Some(end) => &listing[..=end],
        None => "",
    }
}

/// Imports the listing stored at `path`. Returns the bytes consumed, or
/// `None` when there is no file or it is too large to import, in which case
/// the store is left as it was.
pub fn load_listing(engine: &SharedEngine, path: &Path) -> Result<Option<usize>> {
    if !path.exists() {
        log::info!("No macros at {:?}, starting empty", path);
        return Ok(None);
    }
    let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
    match MacroChannel::new(engine.clone()).write_from(file) {
        Ok(consumed) => {
            log::info!("Loaded {} bytes of macros from {:?}", consumed, path);
            Ok(Some(consumed))
        }
        Err(e @ ChannelError::BufferTooLarge { .. }) => {
            log::warn!("Ignoring macros in {:?}: {}", path, e);
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("importing {:?}", path)),
    }
}

/// Writes the current listing to `path`, keeping only the whole lines that
/// a later import accepts. Returns the bytes written.
pub fn save_listing(engine: &SharedEngine, path: &Path) -> Result<usize> {
    let mut listing = String::new();
    MacroChannel::new(engine.clone()).read_to_string(&mut listing)?;

    let kept = fit_listing(&listing);
    if kept.len() < listing.len() {
        log::warn!(
            "Listing is {} bytes, over the {} byte limit; saving only the first {} lines",
            listing.len(),
            MAX_LISTING_SIZE,
            kept.lines().count()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, kept).with_context(|| format!("writing {:?}", path))?;
    Ok(kept.len())
}
