// tm1637.rs

//! Bit-banged driver for the TM1637 4-digit LED controller.
//!
//! The chip talks a two-wire protocol that looks like I2C without addresses:
//! bytes go out LSB first and the chip pulls DIO low on the ninth clock to
//! acknowledge. DIO must be an open-drain pin with a pull-up so that it can
//! be released and read back for the ack.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};
use log::*;

use crate::SegmentDisplay;

const CMD_DATA_AUTO_INCREMENT: u8 = 0x40;
const CMD_ADDRESS: u8 = 0xC0;
const CMD_DISPLAY_CONTROL: u8 = 0x80;
const DISPLAY_ON: u8 = 0x08;

const BIT_DELAY_US: u32 = 100;

pub struct Tm1637<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    brightness: u8,
}

impl<CLK, DIO, D, E> Tm1637<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
{
    pub fn new(mut clk: CLK, mut dio: DIO, delay: D) -> Result<Self, E> {
        // both lines idle high
        clk.set_high()?;
        dio.set_high()?;
        Ok(Self {
            clk,
            dio,
            delay,
            brightness: DISPLAY_ON,
        })
    }

    fn bit_delay(&mut self) {
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn start(&mut self) -> Result<(), E> {
        self.dio.set_low()?;
        self.bit_delay();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), E> {
        self.dio.set_low()?;
        self.bit_delay();
        self.clk.set_high()?;
        self.bit_delay();
        self.dio.set_high()?;
        self.bit_delay();
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<bool, E> {
        let mut data = byte;

        for _ in 0..8 {
            self.clk.set_low()?;
            self.bit_delay();
            if data & 0x01 != 0 {
                self.dio.set_high()?;
            } else {
                self.dio.set_low()?;
            }
            self.bit_delay();
            self.clk.set_high()?;
            self.bit_delay();
            data >>= 1;
        }

        // release DIO and clock in the ack
        self.clk.set_low()?;
        self.dio.set_high()?;
        self.bit_delay();
        self.clk.set_high()?;
        self.bit_delay();
        let ack = self.dio.is_low()?;
        if ack {
            self.dio.set_low()?;
        }
        self.bit_delay();
        self.clk.set_low()?;
        self.bit_delay();

        if !ack {
            debug!("TM1637: no ack for {byte:#04x}");
        }
        Ok(ack)
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), E> {
        self.start()?;
        for b in bytes {
            self.write_byte(*b)?;
        }
        self.stop()
    }

    pub fn write_raw(&mut self, segments: &[u8; 4]) -> Result<(), E> {
        self.command(&[CMD_DATA_AUTO_INCREMENT])?;

        let mut data = [0u8; 5];
        data[0] = CMD_ADDRESS;
        data[1..].copy_from_slice(segments);
        self.command(&data)?;

        self.command(&[CMD_DISPLAY_CONTROL | self.brightness])
    }
}

impl<CLK, DIO, D, E> SegmentDisplay for Tm1637<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
    E: core::fmt::Debug,
{
    type Error = E;

    fn set_brightness(&mut self, level: u8) {
        self.brightness = DISPLAY_ON | (level & 0x07);
    }

    fn write_segments(&mut self, segments: &[u8; 4]) -> Result<(), E> {
        self.write_raw(segments)
    }
}


// EOF
