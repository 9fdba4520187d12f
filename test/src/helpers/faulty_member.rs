use tidal_shared::{
    ByteReader, ByteWrite, EntityLookup, MemberError, MemberSettings, ReplicaMember,
    SerializeMode,
};

/// What a [`FaultyMember`] does wrong
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    None,
    WriteError,
    WritePanic,
    ReadError,
    ReadPanic,
    /// Reads a single byte of its frame
    ShortRead,
}

/// Payload every FaultyMember writes when it doesn't fail
pub const FAULTY_PAYLOAD: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

/// A member that is always dirty and fails on demand. Writes part of its
/// payload before failing so tests can check nothing leaks into the frame.
pub struct FaultyMember {
    pub fault: Fault,
    pub settings: MemberSettings,
    pub read_only: bool,
    /// Payloads applied successfully
    pub received: Vec<Vec<u8>>,
    /// Flush confirmations and explicit clears
    pub clear_count: usize,
}

impl FaultyMember {
    pub fn new(fault: Fault) -> Self {
        Self::with_settings(fault, MemberSettings::default())
    }

    pub fn with_settings(fault: Fault, settings: MemberSettings) -> Self {
        Self {
            fault,
            settings,
            read_only: false,
            received: Vec::new(),
            clear_count: 0,
        }
    }
}

impl ReplicaMember for FaultyMember {
    fn settings(&self) -> MemberSettings {
        self.settings
    }

    fn is_dirty(&self) -> bool {
        true
    }

    fn mark_dirty(&mut self) {}

    fn clear_dirty(&mut self) {
        self.clear_count += 1;
    }

    fn change_mark(&self) -> u64 {
        0
    }

    fn confirm_changes(&mut self, _mark: u64) {
        self.clear_count += 1;
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn write(&self, _mode: SerializeMode, writer: &mut dyn ByteWrite) -> Result<(), MemberError> {
        writer.write_bytes(&FAULTY_PAYLOAD[..2]);
        match self.fault {
            Fault::WriteError => Err(MemberError::custom("scripted write failure")),
            Fault::WritePanic => panic!("scripted write panic"),
            _ => {
                writer.write_bytes(&FAULTY_PAYLOAD[2..]);
                Ok(())
            }
        }
    }

    fn read(
        &mut self,
        _mode: SerializeMode,
        reader: &mut ByteReader,
        _entities: &dyn EntityLookup,
    ) -> Result<(), MemberError> {
        match self.fault {
            Fault::ReadError => {
                reader.read_byte()?;
                Err(MemberError::custom("scripted read failure"))
            }
            Fault::ReadPanic => panic!("scripted read panic"),
            Fault::ShortRead => {
                let byte = reader.read_byte()?;
                self.received.push(vec![byte]);
                Ok(())
            }
            _ => {
                let payload = reader.read_bytes(FAULTY_PAYLOAD.len())?;
                self.received.push(payload.to_vec());
                Ok(())
            }
        }
    }

    fn type_name(&self) -> &'static str {
        "FaultyMember"
    }
}
