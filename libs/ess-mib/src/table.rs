//! Dynamically sized sensor tables
//!
//! A table's target length comes from a sensor-count object read from the
//! device. Rows are appended one at a time, numbered from 1, and never beyond
//! that count.

use serde_json::{Map, Value};

use crate::convert::EssNumber;
use crate::Result;

/// One physical sensor's readings
pub trait EssRow: Send {
    /// 1-based row number
    fn number(&self) -> u32;

    /// Whether this sensor should represent the station
    fn is_active(&self) -> bool {
        true
    }

    fn to_json(&self) -> Result<Map<String, Value>>;
}

/// Ordered rows sized by a sensor-count object
#[derive(Debug, Clone)]
pub struct EssTable<R> {
    sensor_count: EssNumber,
    rows: Vec<R>,
    factory: fn(u32) -> R,
}

impl<R: EssRow> EssTable<R> {
    pub fn new(sensor_count: EssNumber, factory: fn(u32) -> R) -> Self {
        Self {
            sensor_count,
            rows: Vec::new(),
            factory,
        }
    }

    pub fn sensor_count(&self) -> &EssNumber {
        &self.sensor_count
    }

    pub fn sensor_count_mut(&mut self) -> &mut EssNumber {
        &mut self.sensor_count
    }

    /// Reported sensor count, or 0 if it could not be read
    pub fn size(&self) -> usize {
        self.sensor_count
            .integer()
            .map_or(0, |n| usize::try_from(n).unwrap_or(0))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_done(&self) -> bool {
        self.rows.len() >= self.size()
    }

    /// Number the next added row will get
    pub fn next_row_number(&self) -> u32 {
        self.rows.len() as u32 + 1
    }

    /// Append the next row, unless the table is already full
    pub fn add_row(&mut self) -> Option<&mut R> {
        if self.is_done() {
            return None;
        }
        let row = (self.factory)(self.next_row_number());
        self.rows.push(row);
        self.rows.last_mut()
    }

    /// Row `number`, adding it if it is the next one
    ///
    /// Lets a retried exchange reuse the row it already added.
    pub fn ensure_row(&mut self, number: u32) -> Option<&mut R> {
        if number == self.next_row_number() {
            self.add_row()
        } else {
            self.row_mut(number)
        }
    }

    /// 1-based row lookup
    pub fn row(&self, number: u32) -> Option<&R> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, number: u32) -> Option<&mut R> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    pub fn first_active(&self) -> Option<&R> {
        self.rows.iter().find(|r| r.is_active())
    }

    /// Member of row 1 if any row exists, else the table-level default
    pub fn fallback<'a, T: ?Sized>(&'a self, member: impl Fn(&'a R) -> &'a T, default: &'a T) -> &'a T {
        match self.rows.first() {
            Some(row) => member(row),
            None => default,
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Array of row objects, or `None` with no rows
    pub fn to_json(&self) -> Result<Option<Value>> {
        if self.rows.is_empty() {
            return Ok(None);
        }
        let rows = self
            .rows
            .iter()
            .map(|r| r.to_json().map(Value::Object))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Value::Array(rows)))
    }
}
