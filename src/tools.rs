//! Invocation of the external tools: `dovi_tool`, `ffmpeg` and `ffprobe`.

use std::{
    ffi::OsString,
    io::{self, ErrorKind, Read, Write},
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
};

use tracing::{debug, info};

use crate::{append_to_path, SceneError};

pub const DOVI_TOOL: &str = "dovi_tool";
pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";

pub fn require_tool(name: &str) -> Result<PathBuf, SceneError> {
    which::which(name).map_err(|_| SceneError::ToolNotFound(name.to_owned()))
}

fn check_status(tool: &str, status: ExitStatus) -> Result<(), SceneError> {
    if status.success() {
        Ok(())
    } else {
        Err(SceneError::Tool {
            tool: tool.to_owned(),
            status,
        })
    }
}

fn run(tool: &str, cmd: &mut Command) -> Result<(), SceneError> {
    debug!(?cmd, "running {tool}");
    let status = cmd.status().map_err(|source| SceneError::Spawn {
        tool: tool.to_owned(),
        source,
    })?;
    check_status(tool, status)
}

fn spawn(tool: &str, cmd: &mut Command) -> Result<Child, SceneError> {
    debug!(?cmd, "spawning {tool}");
    cmd.spawn().map_err(|source| SceneError::Spawn {
        tool: tool.to_owned(),
        source,
    })
}

/// Kill and reap a child that is no longer needed.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn wait(tool: &str, child: &mut Child) -> Result<(), SceneError> {
    let status = child.wait().map_err(|source| SceneError::Spawn {
        tool: tool.to_owned(),
        source,
    })?;
    check_status(tool, status)
}

/// `-d` argument of `dovi_tool export`, e.g. `level5=<path>`.
fn export_arg(kind: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(kind);
    arg.push("=");
    arg.push(path);
    arg
}

/// Copy `source` into both writers until EOF.
fn tee(source: &mut impl Read, first: &mut impl Write, second: &mut impl Write) -> io::Result<u64> {
    let mut buf = vec![0u8; 1 << 20];
    let mut copied = 0;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => return Ok(copied),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        first.write_all(&buf[..n])?;
        second.write_all(&buf[..n])?;
        copied += n as u64;
    }
}

/// Extract the RPU of a Dolby Vision HEVC video.
///
/// The video stream is remuxed to Annex B by `ffmpeg` and fed to two
/// `dovi_tool` processes: one writes `rpu` untouched, the other writes a
/// profile 8.1 compatible copy next to the video (`<video>_compat.rpu`).
/// Returns the path of the compatible copy.
pub fn extract_rpu(video: &Path, rpu: &Path) -> Result<PathBuf, SceneError> {
    require_tool(FFMPEG)?;
    require_tool(DOVI_TOOL)?;

    let compat = append_to_path(video, "_compat.rpu");
    info!("extracting RPU from {}", video.display());

    let mut ffmpeg = spawn(
        FFMPEG,
        Command::new(FFMPEG)
            .arg("-hide_banner")
            .arg("-i")
            .arg(video)
            .args(["-c:v", "copy", "-bsf:v", "hevc_mp4toannexb", "-f", "hevc", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped()),
    )?;
    let mut compat_tool = spawn(
        DOVI_TOOL,
        Command::new(DOVI_TOOL)
            .args(["-m", "2", "-c", "extract-rpu", "-o"])
            .arg(&compat)
            .arg("-")
            .stdin(Stdio::piped()),
    )
    .inspect_err(|_| reap(&mut ffmpeg))?;
    let mut rpu_tool = spawn(
        DOVI_TOOL,
        Command::new(DOVI_TOOL)
            .args(["extract-rpu", "-o"])
            .arg(rpu)
            .arg("-")
            .stdin(Stdio::piped()),
    )
    .inspect_err(|_| {
        reap(&mut ffmpeg);
        reap(&mut compat_tool);
    })?;

    let copied = match (
        ffmpeg.stdout.take(),
        compat_tool.stdin.take(),
        rpu_tool.stdin.take(),
    ) {
        (Some(mut stream), Some(mut compat_in), Some(mut rpu_in)) => {
            tee(&mut stream, &mut compat_in, &mut rpu_in)
        }
        _ => Err(io::Error::other("child process pipes were not captured")),
    };
    // stdin handles are dropped above, so both dovi_tool processes see EOF

    wait(FFMPEG, &mut ffmpeg)?;
    wait(DOVI_TOOL, &mut compat_tool)?;
    wait(DOVI_TOOL, &mut rpu_tool)?;
    let copied = copied.map_err(|source| SceneError::Spawn {
        tool: DOVI_TOOL.to_owned(),
        source,
    })?;

    debug!(bytes = copied, "video stream passed to dovi_tool");
    Ok(compat)
}

/// Plot the dynamic tone mapping metadata to `<rpu>.png`.
pub fn plot_rpu(rpu: &Path) -> Result<PathBuf, SceneError> {
    require_tool(DOVI_TOOL)?;
    let png = append_to_path(rpu, ".png");
    run(
        DOVI_TOOL,
        Command::new(DOVI_TOOL).arg("plot").arg("-o").arg(&png).arg(rpu),
    )?;
    Ok(png)
}

fn export(rpu: &Path, kind: &str, suffix: &str) -> Result<PathBuf, SceneError> {
    require_tool(DOVI_TOOL)?;
    let out = append_to_path(rpu, suffix);
    run(
        DOVI_TOOL,
        Command::new(DOVI_TOOL)
            .arg("export")
            .arg("-d")
            .arg(export_arg(kind, &out))
            .arg(rpu),
    )?;
    Ok(out)
}

/// Export all metadata to `<rpu>.json`.
pub fn export_all(rpu: &Path) -> Result<PathBuf, SceneError> {
    export(rpu, "all", ".json")
}

/// Export the level 5 metadata to `<rpu>-level5.json`.
pub fn export_level5(rpu: &Path) -> Result<PathBuf, SceneError> {
    export(rpu, "level5", "-level5.json")
}

/// Export the scene cut list to `<rpu>-scenes.txt`.
pub fn export_scenes(rpu: &Path) -> Result<PathBuf, SceneError> {
    export(rpu, "scenes", "-scenes.txt")
}

/// Count the packets of the first video stream.
pub fn ffprobe_frame_count(video: &Path) -> Result<usize, SceneError> {
    require_tool(FFPROBE)?;

    let mut cmd = Command::new(FFPROBE);
    cmd.args(["-v", "error", "-select_streams", "v:0", "-count_packets"])
        .args(["-show_entries", "stream=nb_read_packets", "-of", "csv=p=0"])
        .arg(video);
    debug!(?cmd, "running {FFPROBE}");

    let output = cmd.output().map_err(|source| SceneError::Spawn {
        tool: FFPROBE.to_owned(),
        source,
    })?;
    check_status(FFPROBE, output.status)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value = stdout.trim().trim_end_matches(',');
    value.parse::<usize>().map_err(|_| {
        SceneError::InvalidInput(format!("ffprobe reported \"{value}\" instead of a frame count"))
    })
}
