use colored::*;
use jenusb::mac::constants::sap;
use jenusb::mac::Indication;
use jenusb_frame::codec::MPDU_HEADER_LEN;
use jenusb_frame::{
    decode_native_to_mpdu, Address, AddressingFields, FrameControl, NativeAddress, RxFrame,
};

struct Writer<'b> {
    buffer: &'b mut String,
    indent: usize,
}

impl<'b> Writer<'b> {
    fn new(buffer: &'b mut String) -> Self {
        Self { buffer, indent: 0 }
    }

    fn increase_indent(&mut self) {
        self.indent += 2;
    }

    fn decrease_indent(&mut self) {
        self.indent -= 2;
    }

    fn write(&mut self, s: String) {
        self.buffer.push_str(&" ".repeat(self.indent));
        self.buffer.push_str(&s);
    }

    fn writeln(&mut self, s: String) {
        self.write(s);
        self.buffer.push('\n');
    }

    fn section(&mut self, title: &str) {
        self.writeln(title.underline().bold().to_string());
    }

    fn field(&mut self, name: &str, value: impl core::fmt::Display) {
        self.writeln(format!("{}: {}", name.bold(), value));
    }
}

/// Why an indication could not be printed.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The input is not a hex string.
    Hex(hex::FromHexError),
    /// The octets are not a valid indication.
    Indication(jenusb::Error),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Hex(e) => write!(f, "invalid hex input: {e}"),
            Error::Indication(e) => write!(f, "invalid indication: {e}"),
        }
    }
}

impl std::error::Error for Error {}

pub struct IndicationParser {}

impl IndicationParser {
    pub fn parse_hex(input: &str) -> Result<String, Error> {
        let data = hex::decode(input).map_err(Error::Hex)?;
        Self::parse(&data)
    }

    pub fn parse(input: &[u8]) -> Result<String, Error> {
        let indication = Indication::parse(input).map_err(Error::Indication)?;
        let mut buffer = String::new();

        let mut w = Writer::new(&mut buffer);

        // -----------------------------------------------------------------
        // Header
        // -----------------------------------------------------------------
        w.section("Indication");
        w.increase_indent();
        w.field(
            "service",
            match indication.sap() {
                sap::MCPS => "MCPS".to_string(),
                sap::MLME => "MLME".to_string(),
                other => format!("unknown ({other})"),
            },
        );
        w.field(
            "primitive",
            format!("{} ({})", primitive(&indication), indication.kind()).bright_blue(),
        );
        w.decrease_indent();

        match &indication {
            Indication::Data(data) => write_data(&mut w, &data.frame),
            Indication::DataConfirm(confirm) | Indication::PurgeConfirm(confirm) => {
                w.section("Parameters");
                w.increase_indent();
                w.field("handle", confirm.handle);
                w.field("status", format!("{:?}", confirm.status));
                w.decrease_indent();
            }
            Indication::ScanConfirm(confirm) => {
                w.section("Parameters");
                w.increase_indent();
                w.field("status", format!("{:?}", confirm.status));
                w.field("scan type", format!("{:?}", confirm.scan_type));
                w.field("result count", confirm.result_count);
                w.field(
                    "unscanned channels",
                    format!("{:08x}", confirm.unscanned_channels),
                );
                if let Some(energy) = confirm.energy_detect() {
                    w.field("energy", format!("{:x?}", energy));
                }
                w.decrease_indent();
            }
            Indication::AssociateConfirm(confirm) => {
                w.section("Parameters");
                w.increase_indent();
                w.field("short address", format!("{:04x}", confirm.short_address));
                w.field("status", format!("{:?}", confirm.status));
                w.decrease_indent();
            }
            Indication::DisassociateConfirm(confirm) => {
                w.section("Parameters");
                w.increase_indent();
                w.field("status", format!("{:?}", confirm.status));
                w.decrease_indent();
            }
            Indication::AssociateIndication(event) => {
                w.section("Parameters");
                w.increase_indent();
                w.field("device", extended(event.device));
                w.field("capability", format!("{:02x}", event.capability));
                w.field("security", event.security_use as usize);
                w.decrease_indent();
            }
            Indication::DisassociateIndication(event) => {
                w.section("Parameters");
                w.increase_indent();
                w.field("device", extended(event.device));
                w.field("reason", event.reason);
                w.field("security", event.security_use as usize);
                w.decrease_indent();
            }
            Indication::BeaconNotify(beacon) => {
                let pan = &beacon.pan_descriptor;
                w.section("PAN Descriptor");
                w.increase_indent();
                w.field("coordinator", native(&pan.coordinator));
                w.field("channel", pan.channel);
                w.field("superframe spec", format!("{:04x}", pan.superframe_spec));
                w.field("gts permit", pan.gts_permit as usize);
                w.field("link quality", pan.link_quality);
                w.field("timestamp", pan.timestamp);
                w.field("security", pan.security_use as usize);
                w.field("beacon sequence number", beacon.bsn);
                w.decrease_indent();
            }
            Indication::Unsupported { .. } => {
                w.writeln("not handled by the driver".to_string());
            }
            Indication::Unknown { .. } => {
                w.writeln("unknown".red().to_string());
            }
        }

        Ok(buffer)
    }
}

fn write_data(w: &mut Writer, frame: &RxFrame) {
    // -----------------------------------------------------------------
    // Native Frame
    // -----------------------------------------------------------------
    w.section("Native Frame");
    w.increase_indent();
    w.field("src", native(&frame.src));
    w.field("dst", native(&frame.dst));
    w.field("link quality", frame.link_quality);
    w.field("security", frame.security_use as usize);
    w.field("acl entry", frame.acl_entry);
    w.decrease_indent();

    let mpdu = match decode_native_to_mpdu(frame) {
        Ok(mpdu) => mpdu,
        Err(err) => {
            w.section("MPDU");
            w.increase_indent();
            w.writeln(format!("not reconstructable: {err}").red().to_string());
            w.decrease_indent();
            return;
        }
    };

    // -----------------------------------------------------------------
    // Frame Control
    // -----------------------------------------------------------------
    let fc = FrameControl::new_unchecked(&mpdu[..2]);
    w.section("Frame Control");
    w.increase_indent();
    w.field("frame type", format!("{:?}", fc.frame_type()).bright_blue());
    w.field("security", fc.security_enabled() as usize);
    w.field("frame pending", fc.frame_pending() as usize);
    w.field("ack request", fc.ack_request() as usize);
    w.field("intra pan", fc.intra_pan() as usize);
    w.field(
        "dst addressing mode",
        format!("{:?}", fc.dst_addressing_mode()),
    );
    w.field(
        "src addressing mode",
        format!("{:?}", fc.src_addressing_mode()),
    );
    w.field(
        "frame version",
        format!("{} ({:?})", fc.frame_version() as usize, fc.frame_version()),
    );
    w.decrease_indent();

    // -----------------------------------------------------------------
    // Sequence Number
    // -----------------------------------------------------------------
    w.section("Sequence Number");
    w.increase_indent();
    w.field("sequence number", mpdu[2]);
    w.decrease_indent();

    // -----------------------------------------------------------------
    // Addressing
    // -----------------------------------------------------------------
    let Ok(addr) = AddressingFields::new(&mpdu[MPDU_HEADER_LEN..], &fc) else {
        return;
    };
    if !addr.is_empty() {
        w.section("Addressing");
        w.increase_indent();

        if let Some(dst_pan_id) = addr.dst_pan_id() {
            w.field("dst pan id", format!("{:04x}", dst_pan_id));
        }
        let dst = addr.dst_address();
        if !dst.is_none() {
            w.field("dst addr", address(&dst));
        }

        if let Some(src_pan_id) = addr.src_pan_id() {
            w.field("src pan id", format!("{:04x}", src_pan_id));
        }
        let src = addr.src_address();
        if !src.is_none() {
            w.field("src addr", address(&src));
        }
        w.decrease_indent();
    }

    // -----------------------------------------------------------------
    // Payload
    // -----------------------------------------------------------------
    let payload = &mpdu[MPDU_HEADER_LEN + addr.len()..];
    if !payload.is_empty() {
        w.section("Payload");
        w.increase_indent();
        w.writeln(format!("{:x?}", payload));
        w.decrease_indent();
    }
}

fn primitive(indication: &Indication) -> &'static str {
    match indication {
        Indication::Data(_) => "data indication",
        Indication::DataConfirm(_) => "data confirm",
        Indication::PurgeConfirm(_) => "purge confirm",
        Indication::ScanConfirm(_) => "scan confirm",
        Indication::AssociateConfirm(_) => "associate confirm",
        Indication::DisassociateConfirm(_) => "disassociate confirm",
        Indication::AssociateIndication(_) => "associate indication",
        Indication::DisassociateIndication(_) => "disassociate indication",
        Indication::BeaconNotify(_) => "beacon notify",
        Indication::Unsupported { .. } => "unsupported",
        Indication::Unknown { .. } => "unknown",
    }
}

fn native(address: &NativeAddress) -> String {
    match address.address() {
        Ok(address) => address.to_string(),
        Err(_) => format!("invalid mode {}", address.mode),
    }
}

fn address(address: &Address) -> String {
    let text = match address {
        Address::None => String::new(),
        Address::Short { address, .. } => format!("{:04x}", address),
        Address::Extended { address, .. } => extended(*address),
    };
    if address.is_broadcast() {
        format!("{text} (broadcast)")
    } else {
        text
    }
}

fn extended(address: u64) -> String {
    address
        .to_be_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}
