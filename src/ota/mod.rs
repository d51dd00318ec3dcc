#![deny(unsafe_code)]

//! # Firmware image updates
//!
//! The `reflash` builtin streams a new firmware image into the board's update slot
//! and, once every byte has arrived, asks the board to boot it. The [`Updater`]
//! enforces the order of those steps and checks the image length announced by the
//! server; the board supplies the storage and the boot switch through [`Platform`].
//!
//! ## Design
//!
//! The updater is a small state machine:
//!
//! * `Idle`: no image in progress.
//! * `Downloading`: chunks are being written to the update slot.
//! * `Verifying`: the announced length has been written; the CRC-32 is known.
//! * `Activating`: the board has been told to boot the new image.
//!
//! Any error drops the updater back to `Idle`; the board is expected to treat a slot
//! that was begun but never activated as garbage.

/// Represents the state of the updater.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Waiting for an image.
    Idle,
    /// Receiving an image.
    Downloading {
        /// Announced image size.
        expected: usize,
        /// Bytes stored so far.
        written: usize,
    },
    /// The whole image is in the slot.
    Verifying(Image),
    /// The board is switching to the new image.
    Activating,
}

/// Summary of a completely received image.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Image {
    /// Size in bytes.
    pub size: usize,
    /// CRC-32 (IEEE) of the image bytes.
    pub checksum: u32,
}

/// Represents an error that can occur during an update.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The board has no room for an image of the announced size.
    NoSpace,
    /// The board failed to store a chunk.
    WriteError,
    /// Fewer or more bytes arrived than announced.
    SizeMismatch,
    /// The board refused to boot the image.
    ActivationError,
    /// A step was attempted out of order.
    InvalidState,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NoSpace => defmt::write!(f, "NoSpace"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::SizeMismatch => defmt::write!(f, "SizeMismatch"),
            Error::ActivationError => defmt::write!(f, "ActivationError"),
            Error::InvalidState => defmt::write!(f, "InvalidState"),
        }
    }
}

/// A trait for board-specific update functionality.
pub trait Platform {
    /// Prepares the update slot for an image of `size` bytes.
    fn begin_firmware(&mut self, size: usize) -> Result<(), Error>;

    /// Appends a chunk of the firmware image to the update slot.
    fn save_firmware_chunk(&mut self, chunk: &[u8]) -> Result<(), Error>;

    /// Marks the new image bootable for the next restart.
    ///
    /// Some boards restart immediately and never return on success.
    fn activate_firmware(&mut self) -> Result<(), Error>;
}

/// Drives a [`Platform`] through one image update.
///
/// # Examples
///
/// ```rust
/// use tasksh::ota::{Error, Platform, State, Updater};
///
/// #[derive(Default)]
/// struct Slot(Vec<u8>, bool);
///
/// impl Platform for Slot {
///     fn begin_firmware(&mut self, _size: usize) -> Result<(), Error> { Ok(()) }
///     fn save_firmware_chunk(&mut self, chunk: &[u8]) -> Result<(), Error> {
///         self.0.extend_from_slice(chunk);
///         Ok(())
///     }
///     fn activate_firmware(&mut self) -> Result<(), Error> {
///         self.1 = true;
///         Ok(())
///     }
/// }
///
/// let mut updater = Updater::new(Slot::default());
/// updater.begin(4).unwrap();
/// updater.write(b"ab").unwrap();
/// updater.write(b"cd").unwrap();
/// let image = updater.finish().unwrap();
/// assert_eq!(image.size, 4);
/// updater.activate().unwrap();
/// assert_eq!(*updater.state(), State::Activating);
/// assert!(updater.platform().1);
/// ```
#[derive(Debug)]
pub struct Updater<P: Platform> {
    state: State,
    hasher: crc32fast::Hasher,
    platform: P,
}

impl<P: Platform> Updater<P> {
    /// Creates an idle updater.
    pub fn new(platform: P) -> Self {
        Self {
            state: State::Idle,
            hasher: crc32fast::Hasher::new(),
            platform,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Borrows the board.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Borrows the board mutably.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Starts receiving an image of `size` bytes, discarding any unfinished one.
    pub fn begin(&mut self, size: usize) -> Result<(), Error> {
        if self.state == State::Activating {
            return Err(Error::InvalidState);
        }
        self.state = State::Idle;
        self.platform.begin_firmware(size)?;
        self.hasher = crc32fast::Hasher::new();
        self.state = State::Downloading {
            expected: size,
            written: 0,
        };
        debug!("firmware update started, {} bytes", size);
        Ok(())
    }

    /// Stores the next chunk of the image.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), Error> {
        let State::Downloading { expected, written } = self.state else {
            return Err(Error::InvalidState);
        };
        if written + chunk.len() > expected {
            self.state = State::Idle;
            return Err(Error::SizeMismatch);
        }
        if let Err(err) = self.platform.save_firmware_chunk(chunk) {
            self.state = State::Idle;
            return Err(err);
        }
        self.hasher.update(chunk);
        self.state = State::Downloading {
            expected,
            written: written + chunk.len(),
        };
        Ok(())
    }

    /// Checks that the whole image arrived and reports its checksum.
    pub fn finish(&mut self) -> Result<Image, Error> {
        let State::Downloading { expected, written } = self.state else {
            return Err(Error::InvalidState);
        };
        if written != expected {
            warn!("firmware short: {} of {} bytes", written, expected);
            self.state = State::Idle;
            return Err(Error::SizeMismatch);
        }
        let image = Image {
            size: written,
            checksum: self.hasher.clone().finalize(),
        };
        self.state = State::Verifying(image);
        Ok(image)
    }

    /// Boots the verified image.
    pub fn activate(&mut self) -> Result<(), Error> {
        if !matches!(self.state, State::Verifying(_)) {
            return Err(Error::InvalidState);
        }
        self.state = State::Activating;
        if let Err(err) = self.platform.activate_firmware() {
            self.state = State::Idle;
            return Err(err);
        }
        Ok(())
    }
}
