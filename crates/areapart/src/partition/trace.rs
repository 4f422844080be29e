//! Snapshot output of the controller's progress.
//!
//! A `TraceSink` receives the centers and the covering at fixed points of the
//! iteration. `TraceWriter` renders them as text on two writers:
//! - centers: one `x,y` line per center;
//! - covering: one line per cell, vertices as space-separated `x,y` pairs;
//!
//! with a blank line closing each snapshot on both streams.

use crate::geom2::{Polygon, Vec2};
use std::io::{self, Write};

/// Where in the iteration a snapshot was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceStage {
    /// Before the first diagram (covering not yet built).
    Start,
    /// First diagram from the initial centers.
    InitialDiagram,
    /// After the initial full step onto the centroids.
    InitialCentroidStep,
    /// After a weight update and rebuild.
    WeightStep,
    /// After a center update and rebuild.
    CenterStep,
    Finish,
}

pub trait TraceSink {
    fn record(&mut self, stage: TraceStage, centers: &[Vec2], covering: &[Polygon]) -> io::Result<()>;
}

/// Discards every snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&mut self, _: TraceStage, _: &[Vec2], _: &[Polygon]) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct TraceWriter<C: Write, P: Write> {
    centers: C,
    partition: P,
    snapshots: usize,
}

impl<C: Write, P: Write> TraceWriter<C, P> {
    pub fn new(centers: C, partition: P) -> Self {
        Self {
            centers,
            partition,
            snapshots: 0,
        }
    }

    pub fn snapshots(&self) -> usize {
        self.snapshots
    }

    pub fn into_inner(self) -> (C, P) {
        (self.centers, self.partition)
    }
}

impl<C: Write, P: Write> TraceSink for TraceWriter<C, P> {
    fn record(&mut self, _: TraceStage, centers: &[Vec2], covering: &[Polygon]) -> io::Result<()> {
        for c in centers {
            writeln!(self.centers, "{},{}", c.x, c.y)?;
        }
        for cell in covering {
            for v in cell.vertices() {
                write!(self.partition, "{},{} ", v.x, v.y)?;
            }
            writeln!(self.partition)?;
        }
        writeln!(self.centers)?;
        writeln!(self.partition)?;
        self.snapshots += 1;
        Ok(())
    }
}

/// Collects the stage sequence; handy for checking the controller's schedule.
#[derive(Clone, Debug, Default)]
pub struct StageLog {
    pub stages: Vec<TraceStage>,
}

impl TraceSink for StageLog {
    fn record(&mut self, stage: TraceStage, _: &[Vec2], _: &[Polygon]) -> io::Result<()> {
        self.stages.push(stage);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn writer_formats_centers_and_cells() {
        let mut w = TraceWriter::new(Vec::new(), Vec::new());
        let cell = Polygon::rectangle(vector![0.0, 0.0], vector![0.5, 1.0]).unwrap();
        w.record(
            TraceStage::Finish,
            &[vector![0.25, 0.5], vector![0.75, 0.5]],
            &[cell, Polygon::default()],
        )
        .unwrap();
        assert_eq!(w.snapshots(), 1);
        let (c, p) = w.into_inner();
        assert_eq!(String::from_utf8(c).unwrap(), "0.25,0.5\n0.75,0.5\n\n");
        assert_eq!(
            String::from_utf8(p).unwrap(),
            "0,0 0.5,0 0.5,1 0,1 \n\n\n"
        );
    }
}
