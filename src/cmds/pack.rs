use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::{
    file_cache::FileCache,
    trace_parser::{TencentTraceParser, RECORD_SIZE},
    ConvError, ConvResult,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackStats {
    pub files: usize,
    pub records: usize,
    pub volumes: usize,
    pub bytes: u64,
}

/// Splits Tencent csv traces into one binary trace per volume.
#[derive(Debug, Default)]
pub struct Packer {
    inputs: Vec<PathBuf>,
    out_dir_path: Option<PathBuf>,
    max_open_files: Option<NonZeroUsize>,
    quiet: bool,
}

/// Path of the binary trace of `volume_id` under `out_dir`.
pub fn volume_trace_path(out_dir: &Path, volume_id: u64) -> PathBuf {
    out_dir.join(format!("{volume_id}.bin"))
}

impl Packer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a csv trace file, a `.tar.gz` archive of csv traces, or a directory
    /// searched recursively for either.
    pub fn input(&mut self, input: impl AsRef<Path>) -> &mut Self {
        self.inputs.push(input.as_ref().to_path_buf());
        self
    }

    pub fn out_dir_path(&mut self, out_dir_path: impl AsRef<Path>) -> &mut Self {
        self.out_dir_path = Some(out_dir_path.as_ref().to_path_buf());
        self
    }

    pub fn max_open_files(&mut self, max_open_files: NonZeroUsize) -> &mut Self {
        self.max_open_files = Some(max_open_files);
        self
    }

    /// Do not print file names, progress, or the summary.
    pub fn quiet(&mut self, quiet: bool) -> &mut Self {
        self.quiet = quiet;
        self
    }

    fn collect_trace_files(&self) -> ConvResult<Vec<PathBuf>> {
        if self.inputs.is_empty() {
            return Err(ConvError::invalid_arg("no input trace given"));
        }
        let mut files = Vec::new();
        for input in self.inputs.iter() {
            for entry in walkdir::WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(std::io::Error::from)?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        }
        Ok(files)
    }

    pub fn run(&self) -> ConvResult<PackStats> {
        let out_dir = self.out_dir_path.clone().expect("out dir path not set");
        let max_open_files = self.max_open_files.expect("max open files not set");
        let trace_files = self.collect_trace_files()?;
        std::fs::create_dir_all(&out_dir)?;

        let mut volumes = VolumeWriter {
            out_dir: out_dir.clone(),
            cache: FileCache::with_capacity(max_open_files),
            volumes: HashSet::new(),
            stats: PackStats::default(),
            buf: Vec::with_capacity(RECORD_SIZE),
        };
        let bar = if self.quiet {
            indicatif::ProgressBar::hidden()
        } else {
            indicatif::ProgressBar::new(trace_files.len() as u64)
                .with_style(super::progress_style("packing traces..."))
        };
        let announce = |name: &dyn std::fmt::Display| {
            if !self.quiet {
                bar.suspend(|| println!("{name}"));
            }
        };
        let epoch = std::time::Instant::now();
        for trace_file in trace_files.iter() {
            if is_tar_gz(trace_file) {
                let f = File::open(trace_file).map_err(|e| ConvError::open(trace_file, e))?;
                let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(f));
                for entry in archive.entries()? {
                    let entry = entry?;
                    if !entry.header().entry_type().is_file() {
                        continue;
                    }
                    let member = entry.path()?.display().to_string();
                    announce(&member);
                    let source = format!("{}:{member}", trace_file.display());
                    volumes.pack(TencentTraceParser::from_reader(BufReader::new(entry), source))?;
                }
            } else {
                announce(&trace_file.display());
                volumes.pack(TencentTraceParser::open(trace_file)?)?;
            }
            bar.inc(1);
        }
        let VolumeWriter {
            mut cache,
            volumes,
            mut stats,
            ..
        } = volumes;
        cache.close_all()?;
        bar.finish_and_clear();
        stats.volumes = volumes.len();
        stats.bytes = (stats.records * RECORD_SIZE) as u64;
        log::info!(
            "opened {} trace files for {} volumes",
            cache.opened(),
            stats.volumes
        );
        if !self.quiet {
            let elapsed = epoch.elapsed();
            println!("files: {}", stats.files);
            println!("records: {}", stats.records);
            println!("volumes: {}", stats.volumes);
            println!("written: {}", bytesize::ByteSize::b(stats.bytes));
            println!(
                "packed in {}s{}ms into {}",
                elapsed.as_secs(),
                elapsed.subsec_millis(),
                out_dir.display()
            );
        }
        Ok(stats)
    }
}

/// `.tar.gz` and `.tgz` inputs are read as gzipped tar archives of csv traces.
fn is_tar_gz(path: &Path) -> bool {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Appends records to the binary trace of their volume.
struct VolumeWriter {
    out_dir: PathBuf,
    cache: FileCache,
    volumes: HashSet<u64>,
    stats: PackStats,
    buf: Vec<u8>,
}

impl VolumeWriter {
    fn pack<R: BufRead>(&mut self, parser: TencentTraceParser<R>) -> ConvResult<()> {
        for trace in parser {
            let trace = trace?;
            self.buf.clear();
            trace.record.encode(&mut self.buf);
            self.cache
                .get(&volume_trace_path(&self.out_dir, trace.volume_id))?
                .write_all(&self.buf)?;
            self.volumes.insert(trace.volume_id);
            self.stats.records += 1;
        }
        self.stats.files += 1;
        Ok(())
    }
}
