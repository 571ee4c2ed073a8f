use crate::error::{HostprepError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// HostConfig
// ---------------------------------------------------------------------------

/// What the guard clauses accept and how privileged commands are run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Accepted `ID` / `ID_LIKE` values from os-release.
    pub os_families: Vec<String>,
    pub os_release: PathBuf,
    pub required_tools: Vec<String>,
    /// Prefix privileged commands with sudo when not running as root.
    pub use_sudo: bool,
    pub package_manager: String,
    /// Shell rc file that receives PATH and asdf hooks, relative to home.
    pub shell_rc: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            os_families: ["rhel", "centos", "fedora", "rocky", "almalinux"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            os_release: PathBuf::from("/etc/os-release"),
            required_tools: vec!["git".to_string(), "yum".to_string()],
            use_sudo: true,
            package_manager: "yum".to_string(),
            shell_rc: PathBuf::from(".bashrc"),
        }
    }
}

// ---------------------------------------------------------------------------
// VersionManagerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,
    pub version: String,
    /// Plugin repository, when not in the asdf short-name index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionManagerConfig {
    pub repo: String,
    pub branch: String,
    pub dir: PathBuf,
    pub plugins: Vec<PluginSpec>,
}

impl Default for VersionManagerConfig {
    fn default() -> Self {
        let plugin = |name: &str, version: &str| PluginSpec {
            name: name.to_string(),
            version: version.to_string(),
            url: None,
        };
        Self {
            repo: "https://github.com/asdf-vm/asdf.git".to_string(),
            branch: "v0.14.0".to_string(),
            dir: PathBuf::from(".asdf"),
            plugins: vec![
                plugin("python", "3.12.4"),
                plugin("nodejs", "20.15.0"),
                plugin("golang", "1.22.4"),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// LanguagePackagesConfig / SystemPackagesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagePackagesConfig {
    pub pip: Vec<String>,
    pub npm: Vec<String>,
}

impl Default for LanguagePackagesConfig {
    fn default() -> Self {
        Self {
            pip: vec!["ansible".to_string(), "yamllint".to_string()],
            npm: vec!["pnpm".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemPackagesConfig {
    pub packages: Vec<String>,
}

impl Default for SystemPackagesConfig {
    fn default() -> Self {
        let packages = [
            "epel-release",
            "git",
            "vim-enhanced",
            "tmux",
            "htop",
            "wget",
            "unzip",
            "gcc",
            "make",
            "zlib-devel",
            "bzip2-devel",
            "openssl-devel",
            "readline-devel",
            "sqlite-devel",
            "libffi-devel",
            "xz-devel",
        ];
        Self {
            packages: packages.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ContainerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub repo_url: String,
    pub packages: Vec<String>,
    pub group: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://download.docker.com/linux/centos/docker-ce.repo".to_string(),
            packages: [
                "docker-ce",
                "docker-ce-cli",
                "containerd.io",
                "docker-compose-plugin",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            group: "docker".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// TuningConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysctlEntry {
    pub key: String,
    pub value: String,
}

impl SysctlEntry {
    /// The line written to the sysctl table.
    pub fn line(&self) -> String {
        format!("{} = {}", self.key, self.value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub sysctl_file: PathBuf,
    pub sysctl: Vec<SysctlEntry>,
    pub limits_file: PathBuf,
    pub limits: Vec<String>,
    pub grub_file: PathBuf,
    pub grub_cmdline: Vec<String>,
    pub grub_output: PathBuf,
}

impl Default for TuningConfig {
    fn default() -> Self {
        let entry = |key: &str, value: &str| SysctlEntry {
            key: key.to_string(),
            value: value.to_string(),
        };
        Self {
            sysctl_file: PathBuf::from("/etc/sysctl.conf"),
            sysctl: vec![
                entry("vm.max_map_count", "262144"),
                entry("fs.file-max", "2097152"),
                entry("net.core.somaxconn", "1024"),
            ],
            limits_file: PathBuf::from("/etc/security/limits.conf"),
            limits: vec![
                "* soft nofile 65536".to_string(),
                "* hard nofile 65536".to_string(),
            ],
            grub_file: PathBuf::from("/etc/default/grub"),
            grub_cmdline: vec!["transparent_hugepage=never".to_string()],
            grub_output: PathBuf::from("/boot/grub2/grub.cfg"),
        }
    }
}

impl TuningConfig {
    /// Line appended to the bootloader defaults for the extra kernel arguments.
    pub fn grub_line(&self) -> Option<String> {
        if self.grub_cmdline.is_empty() {
            return None;
        }
        Some(format!(
            "GRUB_CMDLINE_LINUX=\"$GRUB_CMDLINE_LINUX {}\"",
            self.grub_cmdline.join(" ")
        ))
    }
}

// ---------------------------------------------------------------------------
// BinariesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinarySpec {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BinariesConfig {
    pub dir: PathBuf,
    pub items: Vec<BinarySpec>,
}

impl Default for BinariesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".local/bin"),
            items: vec![
                BinarySpec {
                    name: "jq".to_string(),
                    url: "https://github.com/jqlang/jq/releases/download/jq-1.7.1/jq-linux-amd64"
                        .to_string(),
                },
                BinarySpec {
                    name: "yq".to_string(),
                    url: "https://github.com/mikefarah/yq/releases/download/v4.44.1/yq_linux_amd64"
                        .to_string(),
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// ScaffoldConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub files: Vec<ScaffoldFile>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            files: vec![
                ScaffoldFile {
                    path: PathBuf::from(".config/pip/pip.conf"),
                    contents: "[global]\ndisable-pip-version-check = true\n".to_string(),
                },
                ScaffoldFile {
                    path: PathBuf::from(".tmux.conf"),
                    contents: "set -g mouse on\nset -g history-limit 50000\n".to_string(),
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// DotfilesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// Path inside the dotfiles checkout.
    pub source: PathBuf,
    /// Link location, relative to home.
    pub target: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DotfilesConfig {
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub dir: PathBuf,
    pub links: Vec<LinkSpec>,
}

impl Default for DotfilesConfig {
    fn default() -> Self {
        let link = |source: &str, target: &str| LinkSpec {
            source: PathBuf::from(source),
            target: PathBuf::from(target),
        };
        Self {
            repo: None,
            branch: None,
            dir: PathBuf::from(".dotfiles"),
            links: vec![
                link("bashrc", ".bashrc"),
                link("vimrc", ".vimrc"),
                link("gitconfig", ".gitconfig"),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// LogPlatformConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogPlatformConfig {
    pub repo: String,
    pub branch: Option<String>,
    pub dir: PathBuf,
    /// Directory holding the compose file, relative to `dir`.
    pub compose_dir: PathBuf,
    pub services: Vec<String>,
    pub data_dir: PathBuf,
    pub datasets: Vec<Dataset>,
}

impl Default for LogPlatformConfig {
    fn default() -> Self {
        let dataset = |name: &str, url: &str| Dataset {
            name: name.to_string(),
            url: url.to_string(),
        };
        Self {
            repo: "https://github.com/Graylog2/docker-compose.git".to_string(),
            branch: None,
            dir: PathBuf::from(".local/share/graylog"),
            compose_dir: PathBuf::from("open-core"),
            services: vec![
                "mongodb".to_string(),
                "datanode".to_string(),
                "graylog".to_string(),
            ],
            data_dir: PathBuf::from(".local/share/graylog-datasets"),
            datasets: vec![
                dataset(
                    "Linux_2k.log",
                    "https://raw.githubusercontent.com/logpai/loghub/master/Linux/Linux_2k.log",
                ),
                dataset(
                    "Apache_2k.log",
                    "https://raw.githubusercontent.com/logpai/loghub/master/Apache/Apache_2k.log",
                ),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: HostConfig,
    pub version_manager: VersionManagerConfig,
    pub language_packages: LanguagePackagesConfig,
    pub system_packages: SystemPackagesConfig,
    pub container: ContainerConfig,
    pub tuning: TuningConfig,
    pub binaries: BinariesConfig,
    pub local_config: ScaffoldConfig,
    pub dotfiles: DotfilesConfig,
    pub log_platform: LogPlatformConfig,
}

impl Config {
    /// Load from `path`, or fall back to the built-in defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let data = std::fs::read_to_string(path).map_err(|source| HostprepError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut warn = |level: WarnLevel, message: String| {
            warnings.push(ConfigWarning { level, message });
        };

        if self.host.os_families.is_empty() {
            warn(
                WarnLevel::Error,
                "host.os_families is empty; no host will pass the guard".to_string(),
            );
        }

        let mut seen = HashSet::new();
        for plugin in &self.version_manager.plugins {
            if !seen.insert(plugin.name.as_str()) {
                warn(
                    WarnLevel::Warning,
                    format!("plugin '{}' is listed more than once", plugin.name),
                );
            }
        }

        let package_lists = [
            ("system_packages.packages", &self.system_packages.packages),
            ("container.packages", &self.container.packages),
            ("language_packages.pip", &self.language_packages.pip),
            ("language_packages.npm", &self.language_packages.npm),
        ];
        for (field, list) in package_lists {
            if list.iter().any(|p| p.trim().is_empty()) {
                warn(WarnLevel::Warning, format!("{field} contains a blank entry"));
            }
        }

        for binary in &self.binaries.items {
            if binary.name.contains('/') {
                warn(
                    WarnLevel::Error,
                    format!("binary name '{}' must not contain '/'", binary.name),
                );
            }
        }

        for entry in &self.tuning.sysctl {
            if !sysctl_key_re().is_match(&entry.key) {
                warn(
                    WarnLevel::Warning,
                    format!("sysctl key '{}' does not look like a kernel parameter", entry.key),
                );
            }
        }

        for link in &self.dotfiles.links {
            if link.target.is_absolute() {
                warn(
                    WarnLevel::Warning,
                    format!(
                        "dotfile link target '{}' is absolute; targets are meant to live under home",
                        link.target.display()
                    ),
                );
            }
        }

        warnings
    }
}

static SYSCTL_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn sysctl_key_re() -> &'static Regex {
    SYSCTL_KEY_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_\-]+(\.[A-Za-z0-9_\-/]+)+$").expect("sysctl key pattern")
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
