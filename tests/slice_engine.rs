//! End-to-end tests for the two-pass slicing engine against an in-memory
//! alignment source.

use bamslice::model::record::{FLAG_PAIRED, FLAG_SUPPLEMENTARY};
use bamslice::{
    AlignmentRecord, MemorySource, RecordBuffer, Region, SliceConfig, SliceEngine, SliceWriter,
    SupplementaryAlignment,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config() -> SliceConfig {
    SliceConfig {
        read_length_buffer: 100,
        ..SliceConfig::default()
    }
}

/// One end of a pair: placed at [start, start+100], mate fields pointing
/// at the other end.
fn pair_end(
    read_id: &str,
    chromosome: &str,
    start: i64,
    mate_chromosome: &str,
    mate_start: i64,
) -> AlignmentRecord {
    let mut record = AlignmentRecord::new(read_id, chromosome, start, start + 100);
    record.flags = FLAG_PAIRED;
    record.cigar = "101M".to_string();
    record.mate_chromosome = Some(mate_chromosome.to_string());
    record.mate_start = Some(mate_start);
    record
}

fn run_job(
    source: &MemorySource,
    regions: &[Region],
    config: SliceConfig,
) -> (bamslice::SliceSummary, Vec<AlignmentRecord>) {
    let writer = SliceWriter::new(RecordBuffer::new());
    let engine = SliceEngine::new(source, config);
    let summary = engine.slice_regions(regions, &writer).unwrap();
    (summary, writer.into_inner().into_records())
}

#[test]
fn mate_in_unrequested_region_is_resolved() {
    init_logging();
    let mut source = MemorySource::new();
    source.add_chromosome("1", 10_000);
    // read-1 inside [1,1000], read-2 just past the boundary
    source.add_record(pair_end("pair1", "1", 850, "1", 1050));
    source.add_record(pair_end("pair1", "1", 1050, "1", 850));

    let (summary, records) = run_job(&source, &[Region::new("1", 1, 1000)], config());

    // Scatter emits read-1, gather pulls in read-2
    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.remote_positions, 1);
    assert_eq!(summary.remote_hits, 1);
    assert_eq!(summary.remote_misses, 0);

    let mut placements: Vec<(String, i64)> = records
        .iter()
        .map(|r| (r.read_id.clone(), r.start))
        .collect();
    placements.sort();
    assert_eq!(
        placements,
        vec![("pair1".to_string(), 850), ("pair1".to_string(), 1050)]
    );
}

#[test]
fn adjacent_regions_emit_at_least_once() {
    init_logging();
    let mut source = MemorySource::new();
    source.add_chromosome("1", 10_000);
    source.add_record(pair_end("pair1", "1", 850, "1", 1050));
    source.add_record(pair_end("pair1", "1", 1050, "1", 850));

    let regions = vec![Region::new("1", 1, 1000), Region::new("1", 1001, 2000)];
    let (summary, records) = run_job(&source, &regions, config());

    // Region A registers read-2 (1050 is past A's unbuffered end) and
    // region B registers read-1 (850 is below B's buffered lower bound of
    // 901). Both ends are also emitted by their own regions' workers, so
    // the resolved copies are duplicates. At-least-once, not exactly-once.
    assert_eq!(summary.remote_positions, 2);
    assert_eq!(summary.remote_hits, 2);
    assert_eq!(summary.records_written, 4);

    let mut by_placement = std::collections::HashMap::new();
    for record in &records {
        *by_placement.entry((record.read_id.clone(), record.start)).or_insert(0) += 1;
    }
    assert_eq!(by_placement[&("pair1".to_string(), 850)], 2);
    assert_eq!(by_placement[&("pair1".to_string(), 1050)], 2);
}

#[test]
fn mate_inside_buffer_window_is_not_registered() {
    init_logging();
    let mut source = MemorySource::new();
    source.add_chromosome("1", 10_000);
    // Both ends straddle the region boundary; the 980 end starts below
    // the region but within the 100-base buffer
    source.add_record(pair_end("pair1", "1", 1050, "1", 980));
    source.add_record(pair_end("pair1", "1", 980, "1", 1050));

    let (summary, records) = run_job(&source, &[Region::new("1", 1001, 2000)], config());
    // 980 >= 1001 - 100 and 1050 <= 2000, so both mates count as inside:
    // nothing to resolve. Both records overlap the region bodily and are
    // emitted by the scatter pass alone.
    assert_eq!(summary.remote_positions, 0);
    assert_eq!(summary.remote_hits, 0);
    assert_eq!(summary.records_written, 2);
    assert_eq!(records.len(), 2);
}

#[test]
fn supplementary_on_other_chromosome_is_resolved() {
    init_logging();
    let mut source = MemorySource::new();
    source.add_chromosome("1", 10_000);
    source.add_chromosome("2", 10_000);

    let mut primary = AlignmentRecord::new("split", "1", 500, 600);
    primary.supplementary = Some(SupplementaryAlignment::new("2", 500));
    source.add_record(primary);

    let mut supplementary = AlignmentRecord::new("split", "2", 500, 560);
    supplementary.flags = FLAG_SUPPLEMENTARY;
    source.add_record(supplementary);

    let (summary, records) = run_job(&source, &[Region::new("1", 1, 1000)], config());

    assert_eq!(summary.remote_positions, 1);
    assert_eq!(summary.remote_hits, 1);
    assert_eq!(summary.records_written, 2);
    assert!(records
        .iter()
        .any(|r| r.chromosome == "2" && r.is_supplementary()));
}

#[test]
fn no_cross_region_links_means_no_point_queries() {
    init_logging();
    let mut source = MemorySource::new();
    source.add_chromosome("1", 10_000);
    source.add_record(AlignmentRecord::new("r1", "1", 100, 200));
    source.add_record(AlignmentRecord::new("r2", "1", 300, 400));

    let (summary, records) = run_job(&source, &[Region::new("1", 1, 1000)], config());

    assert_eq!(summary.remote_positions, 0);
    assert_eq!(summary.remote_misses, 0);
    assert_eq!(records.len(), 2);
    assert_eq!(source.point_queries(), 0);
}

#[test]
fn unresolvable_remote_position_is_a_silent_miss() {
    init_logging();
    let mut source = MemorySource::new();
    source.add_chromosome("1", 10_000);
    // Mate coordinates point at nothing (filtered upstream)
    source.add_record(pair_end("orphan", "1", 500, "1", 5000));

    let (summary, records) = run_job(&source, &[Region::new("1", 1, 1000)], config());

    assert_eq!(summary.remote_positions, 1);
    assert_eq!(summary.remote_hits, 0);
    assert_eq!(summary.remote_misses, 1);
    assert_eq!(records.len(), 1);
}

#[test]
fn partition_budget_caps_emitted_records() {
    init_logging();
    let mut source = MemorySource::new();
    source.add_chromosome("1", 10_000);
    for i in 0..10 {
        source.add_record(AlignmentRecord::new(
            format!("r{}", i),
            "1",
            1000 + i * 10,
            1100 + i * 10,
        ));
    }

    let budgeted = SliceConfig {
        max_partition_reads: 4,
        ..config()
    };
    let (summary, records) = run_job(&source, &[Region::new("1", 1, 10_000)], budgeted);

    assert_eq!(summary.records_written, 4);
    assert_eq!(records.len(), 4);
    assert_eq!(summary.partitions_halted, 1);
}

#[test]
fn thread_count_does_not_change_the_emitted_set() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);
    let mut source = MemorySource::new();
    source.add_chromosome("1", 100_000);
    source.add_chromosome("2", 100_000);

    // Proper pairs scattered across both chromosomes
    for i in 0..150 {
        let chrom_a = if rng.gen_bool(0.5) { "1" } else { "2" };
        let chrom_b = if rng.gen_bool(0.5) { "1" } else { "2" };
        let start_a = rng.gen_range(1..90_000);
        let start_b = rng.gen_range(1..90_000);
        let read_id = format!("pair{}", i);
        source.add_record(pair_end(&read_id, chrom_a, start_a, chrom_b, start_b));
        source.add_record(pair_end(&read_id, chrom_b, start_b, chrom_a, start_a));
    }
    // And some unpaired records
    for i in 0..50 {
        let start = rng.gen_range(1..90_000);
        source.add_record(AlignmentRecord::new(format!("r{}", i), "1", start, start + 100));
    }

    let regions = vec![Region::new("1", 1, 50_000), Region::new("2", 20_000, 70_000)];
    let placements = |records: Vec<AlignmentRecord>| {
        let mut keys: Vec<(String, String, i64)> = records
            .into_iter()
            .map(|r| (r.read_id, r.chromosome, r.start))
            .collect();
        keys.sort();
        keys
    };

    let single = SliceConfig {
        worker_threads: 1,
        partition_size: 10_000,
        ..config()
    };
    let multi = SliceConfig {
        worker_threads: 4,
        ..single.clone()
    };

    let (_, records_single) = run_job(&source, &regions, single);
    let (_, records_multi) = run_job(&source, &regions, multi);

    assert!(!records_single.is_empty());
    assert_eq!(placements(records_single), placements(records_multi));
}
