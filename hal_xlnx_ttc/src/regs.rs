//! TTC register map
//!
//! Offsets are relative to the base address of one counter channel of
//! the Xilinx PS Triple Timer Counter. Only the registers the system
//! timer touches are listed.

/// Clock control (prescaler, clock source)
pub const CLK_CNTRL: usize = 0x00;
/// Counter control
pub const CNT_CNTRL: usize = 0x0C;
/// Current counter value (read-only)
pub const COUNT_VALUE: usize = 0x18;
/// Interval value for interval mode
pub const INTERVAL_VAL: usize = 0x24;
/// Match 0 value
pub const MATCH_0: usize = 0x30;
/// Match 1 value
pub const MATCH_1: usize = 0x3C;
/// Match 2 value
pub const MATCH_2: usize = 0x48;
/// Interrupt status (cleared on read)
pub const ISR: usize = 0x54;
/// Interrupt enable
pub const IER: usize = 0x60;

/// Size of the register window in bytes
pub const REGISTER_SPAN: usize = IER + 4;

/// Counter disable
pub const CNT_CNTRL_DIS: u32 = 0x01;
/// Interval mode
pub const CNT_CNTRL_INT: u32 = 0x02;
/// Count down instead of up
pub const CNT_CNTRL_DECR: u32 = 0x04;
/// Match mode
pub const CNT_CNTRL_MATCH: u32 = 0x08;
/// Counter reset (self-clearing)
pub const CNT_CNTRL_RST: u32 = 0x10;
/// Waveform output disable
pub const CNT_CNTRL_EN_WAVE: u32 = 0x20;
/// Waveform polarity
pub const CNT_CNTRL_POL_WAVE: u32 = 0x40;
/// Counter control value after hardware reset: stopped, waveform off
pub const CNT_CNTRL_RESET_VALUE: u32 = CNT_CNTRL_DIS | CNT_CNTRL_EN_WAVE;

/// Interval interrupt
pub const IXR_INTERVAL: u32 = 0x01;
/// Match 0 interrupt
pub const IXR_MATCH_0: u32 = 0x02;
/// Match 1 interrupt
pub const IXR_MATCH_1: u32 = 0x04;
/// Match 2 interrupt
pub const IXR_MATCH_2: u32 = 0x08;
/// Counter overflow interrupt
pub const IXR_CNT_OVR: u32 = 0x10;
/// All interrupt sources
pub const IXR_ALL: u32 = IXR_INTERVAL | IXR_MATCH_0 | IXR_MATCH_1 | IXR_MATCH_2 | IXR_CNT_OVR;

/// Longest interval the 32-bit counter can represent
pub const MAX_INTERVAL_COUNT: u32 = 0xFFFF_FFFF;
