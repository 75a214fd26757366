//! The whole-game save envelope.
//!
//! Layout: magic, version, world time, globals, party, then a record table
//! where every entity body is length-prefixed. The prefix is the fault
//! boundary: a record that fails to decode is skipped by reseeking past its
//! body, while damage to the envelope itself fails the whole file.

use std::io::Write;

use boreal_foundation::{Error, LocalValue, ObjectId, Result};
use boreal_world::World;
use tracing::warn;

use crate::codec::{SaveReader, SaveWriter};
use crate::record::EntityRecord;
use crate::resolve::resolve_references;

/// File signature, first four bytes of every save.
pub const SAVE_MAGIC: [u8; 4] = *b"BSAV";

/// Current format version. Readers reject anything newer.
pub const SAVE_VERSION: u32 = 1;

/// A complete captured game state.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveGame {
    /// World clock at capture time.
    pub time: f64,
    /// Global variables in name order.
    pub globals: Vec<(String, LocalValue)>,
    /// Party roster.
    pub party: PartyRecord,
    /// Every allocated entity, id order, destroyed shells included.
    pub records: Vec<EntityRecord>,
}

/// Serialized party roster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartyRecord {
    /// Member handles in join order.
    pub members: Vec<ObjectId>,
    /// The leader, if one was set.
    pub leader: Option<ObjectId>,
}

/// A decoded save plus the damage tally.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSave {
    /// The decoded state.
    pub save: SaveGame,
    /// Entity records dropped because their bodies would not decode.
    pub records_skipped: u32,
}

/// What a restore did to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreReport {
    /// Entities recreated at their saved ids.
    pub entities_restored: u32,
    /// Records whose restore failed (id collisions, mostly).
    pub records_failed: u32,
    /// Dangling references nulled after the batch.
    pub dangling_cleared: u32,
}

impl SaveGame {
    /// Snapshots the world: time, globals, party, and the entire id space.
    ///
    /// Destroyed shells are captured too, so restored worlds never reissue a
    /// retired id.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        Self {
            time: world.time(),
            globals: world
                .globals()
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            party: PartyRecord {
                members: world.party().members().to_vec(),
                leader: world.party().leader(),
            },
            records: world.all_entities().map(EntityRecord::capture).collect(),
        }
    }

    /// Serializes to an owned buffer.
    ///
    /// # Errors
    ///
    /// Returns `Argument` for unserializable content (oversized strings) and
    /// `Io` for writer failures.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = SaveWriter::new(Vec::new());
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut SaveWriter<W>) -> Result<()> {
        writer.write_bytes(&SAVE_MAGIC)?;
        writer.write_u32(SAVE_VERSION)?;
        writer.write_f64(self.time)?;

        writer.write_u32(count(self.globals.len())?)?;
        for (name, value) in &self.globals {
            writer.write_string(name)?;
            writer.write_value(value)?;
        }

        writer.write_u32(count(self.party.members.len())?)?;
        for member in &self.party.members {
            writer.write_object_id(*member)?;
        }
        match self.party.leader {
            Some(leader) => {
                writer.write_bool(true)?;
                writer.write_object_id(leader)?;
            }
            None => writer.write_bool(false)?,
        }

        writer.write_u32(count(self.records.len())?)?;
        for record in &self.records {
            let mut body = SaveWriter::new(Vec::new());
            record.write_to(&mut body)?;
            let body = body.into_inner();
            writer.write_u32(count(body.len())?)?;
            writer.write_bytes(&body)?;
        }
        Ok(())
    }

    /// Decodes a save, skipping entity records whose bodies are damaged.
    ///
    /// # Errors
    ///
    /// Returns `CorruptData` when the envelope itself is unreadable: wrong
    /// magic, an unknown version, or truncation outside a record body.
    pub fn decode(bytes: &[u8]) -> Result<LoadedSave> {
        let mut reader = SaveReader::new(bytes);

        let magic = reader.read_bytes(SAVE_MAGIC.len())?;
        if magic != SAVE_MAGIC {
            return Err(Error::corrupt_data("bad save magic"));
        }
        let version = reader.read_u32()?;
        if version != SAVE_VERSION {
            return Err(Error::corrupt_data(format!(
                "unsupported save version {version}"
            )));
        }
        let time = reader.read_f64()?;

        let global_count = reader.read_u32()?;
        let mut globals = Vec::with_capacity(global_count.min(1024) as usize);
        for _ in 0..global_count {
            let name = reader.read_string()?;
            globals.push((name, reader.read_value()?));
        }

        let member_count = reader.read_u32()?;
        let mut members = Vec::with_capacity(member_count.min(64) as usize);
        for _ in 0..member_count {
            members.push(reader.read_object_id()?);
        }
        let leader = if reader.read_bool()? {
            Some(reader.read_object_id()?)
        } else {
            None
        };

        let record_count = reader.read_u32()?;
        let mut records = Vec::with_capacity(record_count.min(4096) as usize);
        let mut records_skipped = 0u32;
        for index in 0..record_count {
            let length = reader.read_u32()?;
            let body = reader.read_bytes(length as usize)?;
            let mut body_reader = SaveReader::new(body.as_slice());
            match EntityRecord::read_from(&mut body_reader) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(index, %error, "skipping undecodable entity record");
                    records_skipped += 1;
                }
            }
        }

        Ok(LoadedSave {
            save: Self {
                time,
                globals,
                party: PartyRecord { members, leader },
                records,
            },
            records_skipped,
        })
    }

    /// Rebuilds `world` from this save. The world should hold the module's
    /// areas already but no entities.
    ///
    /// Records that fail to restore are counted, not fatal. After the batch,
    /// cross-references pointing at ids that did not come back are cleared,
    /// and the synthetic events of reconstruction are discarded so the first
    /// post-load tick starts clean.
    pub fn restore(&self, world: &mut World) -> RestoreReport {
        let mut report = RestoreReport::default();

        world.set_time(self.time);
        for (name, value) in &self.globals {
            world.set_global(name.clone(), value.clone());
        }

        for record in &self.records {
            match record.restore(world) {
                Ok(_) => report.entities_restored += 1,
                Err(error) => {
                    warn!(id = %record.id, %error, "entity record failed to restore");
                    report.records_failed += 1;
                }
            }
        }

        for member in &self.party.members {
            if world.is_valid(*member) {
                world.party_mut().add_member(*member);
            } else {
                warn!(id = %member, "saved party member did not restore");
            }
        }
        if let Some(leader) = self.party.leader {
            if let Err(error) = world.party_mut().set_leader(leader) {
                warn!(%error, "saved party leader did not restore");
            }
        }

        report.dangling_cleared = resolve_references(world).total();
        world.drain_events();
        report
    }
}

fn count(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::argument("save section exceeds the u32 count prefix"))
}
