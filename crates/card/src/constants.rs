//! Applet constants: identifiers, instruction codes and size limits

/// Applet identifier, compiled into every session (10 bytes)
pub const APPLET_AID: [u8; 10] = [
    0xA0, 0x00, 0x00, 0x00, 0x62, 0x03, 0x01, 0x0A, 0x01, 0x00,
];

/// Class byte for all applet commands
pub const CLA_APP: u8 = 0xA0;

/// Instruction codes understood by the applet
pub mod ins {
    /// Verify the holder PIN
    pub const VERIFY_PIN: u8 = 0x20;
    /// Change the holder PIN
    pub const CHANGE_PIN: u8 = 0x21;
    /// Unblock the PIN, resetting it to the default
    pub const UNBLOCK_PIN: u8 = 0x22;
    /// Enroll the holder and generate the on-card RSA identity
    pub const REGISTER: u8 = 0x30;
    /// Read the card identifier and blocked flag
    pub const GET_CARD_ID: u8 = 0x32;
    /// Sign a host challenge with the on-card key
    pub const SIGN_CHALLENGE: u8 = 0x34;
    /// Replace the encrypted user record
    pub const UPDATE_INFO: u8 = 0x36;
    /// Read the decrypted user record
    pub const GET_INFO: u8 = 0x38;
    /// Read the points counter
    pub const GET_POINTS: u8 = 0x3A;
    /// Replace the points counter
    pub const UPDATE_POINTS: u8 = 0x3C;
    /// Write one image chunk at an offset
    pub const WRITE_IMAGE: u8 = 0x10;
    /// Read one image chunk at an offset
    pub const READ_IMAGE: u8 = 0x12;
}

/// Largest data field carried in one chunked-transfer command
pub const MAX_CHUNK: usize = 240;

/// On-card image capacity in bytes; uploads beyond this are truncated
pub const IMAGE_CAPACITY: usize = 4096;

/// Cipher block size the applet encrypts user records in
pub const INFO_BLOCK: usize = 16;

/// PIN value the card restores on unblock
pub const DEFAULT_PIN: &str = "1234";

/// Reader-name markers identifying the virtual development reader
pub const VIRTUAL_READER_MARKERS: [&str; 2] = ["JAVACOS", "Virtual"];
