//! Image loading (spec §6).
//!
//! An image is a small header followed by two segments: a kernel image
//! copied to `IMAGE_START` and a user image copied to `USER_SPACE_START`.
//! Layout: `kernel_len: u32`, `user_len: u32`, then `kernel_len` bytes of
//! kernel image, then `user_len` bytes of user image.

use crate::memory::{FlatMemory, MAX_KERNEL_LEN, MAX_USER_LEN, USER_SPACE_START};

const HEADER_LEN: usize = 8;

quick_error! {
    /// Failure to load an image, always surfaced before a single instruction
    /// has run — distinct from `Fault`, which can only occur once execution
    /// has started (spec.md §10.1).
    #[derive(Debug, PartialEq, Eq, Clone)]
    pub enum LoadError {
        TruncatedImage(expected: usize, got: usize) {
            display("truncated image: expected at least {} bytes, got {}", expected, got)
        }
        KernelTooLarge(len: u32, max: u32) {
            display("kernel segment too large: {} bytes (max {})", len, max)
        }
        UserTooLarge(len: u32, max: u32) {
            display("user segment too large: {} bytes (max {})", len, max)
        }
    }
}

/// copies the kernel/user segments of `image` into `mem` per the layout
/// above. `mem`'s existing contents elsewhere (syscall table, stacks) are
/// left untouched; the caller is expected to start from a fresh `FlatMemory`.
pub fn load_image(mem: &mut FlatMemory, image: &[u8]) -> Result<(), LoadError> {
    if image.len() < HEADER_LEN {
        return Err(LoadError::TruncatedImage(HEADER_LEN, image.len()));
    }

    let kernel_len = u32::from_le_bytes([image[0], image[1], image[2], image[3]]);
    let user_len = u32::from_le_bytes([image[4], image[5], image[6], image[7]]);

    if kernel_len > MAX_KERNEL_LEN {
        return Err(LoadError::KernelTooLarge(kernel_len, MAX_KERNEL_LEN));
    }
    if user_len > MAX_USER_LEN {
        return Err(LoadError::UserTooLarge(user_len, MAX_USER_LEN));
    }

    let kernel_end = HEADER_LEN + kernel_len as usize;
    let user_end = kernel_end + user_len as usize;
    if image.len() < user_end {
        return Err(LoadError::TruncatedImage(user_end, image.len()));
    }

    let kernel_bytes = &image[HEADER_LEN..kernel_end];
    let user_bytes = &image[kernel_end..user_end];

    // IMAGE_START/USER_SPACE_START plus MAX_KERNEL_LEN/MAX_USER_LEN are
    // already checked against MAX_MEMORY by construction (spec §3), so
    // these writes cannot themselves go out of bounds.
    mem.write_slice(crate::memory::IMAGE_START, kernel_bytes)
        .expect("kernel segment within its fixed window by construction");
    mem.write_slice(USER_SPACE_START, user_bytes)
        .expect("user segment within its fixed window by construction");

    Ok(())
}

#[cfg(test)]
#[path = "./loader_test.rs"]
mod loader_test;
