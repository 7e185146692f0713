//! PIO-based WS2812 driver
//!
//! Uses one PIO state machine to shift GRB words out at 800 kHz. The
//! program spends 10 PIO cycles per bit: the line goes high for 2 cycles,
//! stays high for 5 more on a one bit, then low for the remainder.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_rp::Peri;
use embassy_time::Timer;
use fixed::types::U24F8;

/// WS2812 bit rate in kHz
const BIT_RATE_KHZ: u32 = 800;

/// PIO cycles per bit
const CYCLES_PER_BIT: u32 = 10;

/// Wait after the last push: four FIFO words still to shift (30 µs each)
/// plus the 50 µs latch
const RESET_US: u64 = 200;

/// WS2812 strip on a PIO state machine
pub struct Ws2812<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
}

impl<'d, PIO: Instance, const SM: usize> Ws2812<'d, PIO, SM> {
    /// Load the bit program and start the state machine on `pin`
    pub fn new<P: PioPin>(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        pin: Peri<'d, P>,
    ) -> Self {
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "out x, 1       side 0 [2]",
            "jmp !x do_zero side 1 [1]",
            "jmp bitloop    side 1 [4]",
            "do_zero:",
            "nop            side 0 [4]",
            ".wrap"
        );

        let installed = common.load_program(&prg.program);
        let out_pin = common.make_pio_pin(pin);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&out_pin]);
        cfg.set_out_pins(&[&out_pin]);

        // clk_sys / (800 kHz * 10) as a 24.8 divider
        let clock_khz = U24F8::from_num(clk_sys_freq() / 1000);
        cfg.clock_divider = clock_khz / U24F8::from_num(BIT_RATE_KHZ * CYCLES_PER_BIT);

        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 24,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::Out, &[&out_pin]);
        sm.set_enable(true);

        Self { sm }
    }

    /// Shift out one frame of GRB words and wait for the latch
    pub async fn write(&mut self, words: &[u32]) {
        for &word in words {
            self.sm.tx().wait_push(word).await;
        }
        Timer::after_micros(RESET_US).await;
    }
}
