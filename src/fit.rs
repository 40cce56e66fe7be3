use std::io::{self, Write};
use std::path::PathBuf;

use crate::payload::payload_name;
use crate::LoadSegment;

// Payloads produced by the u-boot build itself, referenced by name only.
const UBOOT_BIN: &str = "u-boot-nodtb.bin";
const UBOOT_DTB: &str = "u-boot.dtb";

const DTS_HEADER: &str = "/*
 * Copyright (C) 2017 Fuzhou Rockchip Electronics Co., Ltd
 *
 * Minimal dts for a SPL FIT image payload.
 *
 * SPDX-License-Identifier: GPL-2.0+  X11
 */
/dts-v1/;

/ {
\tdescription = \"Configuration to load ATF before U-Boot\";
\t#address-cells = <1>;

\timages {";

/// The generated image tree, built up front and rendered in one pass.
pub struct FitSource {
    uboot: UbootNode,
    atf: Vec<AtfNode>,
    fdt: Vec<FdtNode>,
    configs: Vec<ConfigNode>,
}

struct UbootNode {
    load: u64,
}

struct AtfNode {
    index: usize,
    load: u64,
    entry: Option<u64>,
}

struct FdtNode {
    index: usize,
}

struct ConfigNode {
    index: usize,
    loadables: Vec<String>,
}

impl FitSource {
    /// Build the tree for one u-boot stage and the bl31 segments, with one
    /// fdt and config node per device tree. The device tree names only
    /// determine node count and order; the embedded blob is always
    /// u-boot.dtb. At least one device tree is required for the resulting
    /// `default = "config@1"` reference to resolve.
    pub fn new(uboot_load: u64, bl31_segments: &[LoadSegment], dtbs: &[PathBuf]) -> FitSource {
        let atf: Vec<AtfNode> = bl31_segments
            .iter()
            .enumerate()
            .map(|(i, segment)| AtfNode {
                index: i + 1,
                load: segment.addr,
                // the first bl31 segment is the entry point of the chain
                entry: if i == 0 { Some(segment.addr) } else { None },
            })
            .collect();

        // Every config loads the whole chain: u-boot plus all bl31 segments
        // in extraction order.
        let mut loadables = vec!["uboot@1".to_string()];
        loadables.extend(atf.iter().map(|node| format!("atf@{}", node.index)));

        let fdt = (1..=dtbs.len()).map(|index| FdtNode { index }).collect();
        let configs = (1..=dtbs.len())
            .map(|index| ConfigNode {
                index,
                loadables: loadables.clone(),
            })
            .collect();

        FitSource {
            uboot: UbootNode { load: uboot_load },
            atf,
            fdt,
            configs,
        }
    }

    pub fn render(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "{}", DTS_HEADER)?;
        self.uboot.render(w)?;
        for node in &self.atf {
            node.render(w)?;
        }
        for node in &self.fdt {
            node.render(w)?;
        }
        writeln!(w, "\t}};")?;
        writeln!(w)?;
        writeln!(w, "\tconfigurations {{")?;
        writeln!(w, "\t\tdefault = \"config@1\";")?;
        for node in &self.configs {
            node.render(w)?;
        }
        writeln!(w, "\t}};")?;
        writeln!(w, "}};")?;
        Ok(())
    }
}

fn render_hash(w: &mut impl Write) -> io::Result<()> {
    writeln!(w, "\t\t\thash@1 {{")?;
    writeln!(w, "\t\t\t\talgo = \"sha256\";")?;
    writeln!(w, "\t\t\t}};")?;
    Ok(())
}

impl UbootNode {
    fn render(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "\t\tuboot@1 {{")?;
        writeln!(w, "\t\t\tdescription = \"U-Boot (64-bit)\";")?;
        writeln!(w, "\t\t\tdata = /incbin/(\"{}\");", UBOOT_BIN)?;
        writeln!(w, "\t\t\ttype = \"standalone\";")?;
        writeln!(w, "\t\t\tos = \"U-Boot\";")?;
        writeln!(w, "\t\t\tarch = \"arm64\";")?;
        writeln!(w, "\t\t\tcompression = \"none\";")?;
        writeln!(w, "\t\t\tload = <0x{:08x}>;", self.load)?;
        render_hash(w)?;
        writeln!(w, "\t\t}};")?;
        writeln!(w)?;
        Ok(())
    }
}

impl AtfNode {
    fn render(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "\t\tatf@{} {{", self.index)?;
        writeln!(w, "\t\t\tdescription = \"ARM Trusted Firmware\";")?;
        writeln!(w, "\t\t\tdata = /incbin/(\"{}\");", payload_name(self.load))?;
        writeln!(w, "\t\t\ttype = \"firmware\";")?;
        writeln!(w, "\t\t\tarch = \"arm64\";")?;
        writeln!(w, "\t\t\tos = \"arm-trusted-firmware\";")?;
        writeln!(w, "\t\t\tcompression = \"none\";")?;
        writeln!(w, "\t\t\tload = <0x{:08x}>;", self.load)?;
        if let Some(entry) = self.entry {
            writeln!(w, "\t\t\tentry = <0x{:08x}>;", entry)?;
        }
        render_hash(w)?;
        writeln!(w, "\t\t}};")?;
        writeln!(w)?;
        Ok(())
    }
}

impl FdtNode {
    fn render(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "\t\tfdt@{} {{", self.index)?;
        writeln!(w, "\t\t\tdescription = \"U-Boot device tree blob\";")?;
        writeln!(w, "\t\t\tdata = /incbin/(\"{}\");", UBOOT_DTB)?;
        writeln!(w, "\t\t\ttype = \"flat_dt\";")?;
        writeln!(w, "\t\t\tarch = \"arm64\";")?;
        writeln!(w, "\t\t\tcompression = \"none\";")?;
        render_hash(w)?;
        writeln!(w, "\t\t}};")?;
        writeln!(w)?;
        Ok(())
    }
}

impl ConfigNode {
    fn render(&self, w: &mut impl Write) -> io::Result<()> {
        let loadables = self
            .loadables
            .iter()
            .map(|name| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(w, "\t\tconfig@{} {{", self.index)?;
        writeln!(w, "\t\t\tdescription = \"Rockchip armv8 with ATF\";")?;
        writeln!(w, "\t\t\trollback-index = <0x0>;")?;
        writeln!(w, "\t\t\tfirmware = \"atf@1\";")?;
        writeln!(w, "\t\t\tloadables = {};", loadables)?;
        writeln!(w, "\t\t\tfdt = \"fdt@1\";")?;
        writeln!(w, "\t\t\tsignature@1 {{")?;
        writeln!(w, "\t\t\t\talgo = \"sha256,rsa2048\";")?;
        writeln!(w, "\t\t\t\tkey-name-hint = \"dev\";")?;
        writeln!(w, "\t\t\t\tsign-images = \"fdt\", \"firmware\", \"loadables\";")?;
        writeln!(w, "\t\t\t}};")?;
        writeln!(w, "\t\t}};")?;
        writeln!(w)?;
        Ok(())
    }
}
