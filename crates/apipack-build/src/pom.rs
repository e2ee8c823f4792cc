//! Maven POM rendering of a build descriptor.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use apipack_model::{BuildDescriptor, ConfigValue, Configuration, PluginBinding};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

pub const POM_NS: &str = "http://maven.apache.org/POM/4.0.0";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const POM_SCHEMA_LOCATION: &str =
    "http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd";

/// Render the POM document for `build`.
pub fn render_pom(build: &BuildDescriptor) -> Result<String> {
    let mut buffer = Vec::new();
    write_pom_to(&mut buffer, build)?;
    String::from_utf8(buffer).context("POM output is not UTF-8")
}

/// Write the POM document for `build` to `path`.
pub fn write_pom(path: &Path, build: &BuildDescriptor) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_pom_to(&mut writer, build)?;
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))
}

fn write_pom_to<W: Write>(out: W, build: &BuildDescriptor) -> Result<()> {
    let mut xml = Writer::new_with_indent(out, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut project = BytesStart::new("project");
    project.push_attribute(("xmlns", POM_NS));
    project.push_attribute(("xmlns:xsi", XSI_NS));
    project.push_attribute(("xsi:schemaLocation", POM_SCHEMA_LOCATION));
    xml.write_event(Event::Start(project))?;

    write_text_element(&mut xml, "modelVersion", &build.model_version)?;
    write_text_element(&mut xml, "groupId", &build.group_id)?;
    write_text_element(&mut xml, "artifactId", &build.artifact_id)?;
    write_text_element(&mut xml, "version", &build.version)?;
    if let Some(name) = &build.name {
        write_text_element(&mut xml, "name", name)?;
    }

    if !build.dependencies.is_empty() {
        xml.write_event(Event::Start(BytesStart::new("dependencies")))?;
        for dependency in &build.dependencies {
            xml.write_event(Event::Start(BytesStart::new("dependency")))?;
            write_text_element(&mut xml, "groupId", &dependency.group_id)?;
            write_text_element(&mut xml, "artifactId", &dependency.artifact_id)?;
            write_text_element(&mut xml, "version", &dependency.version)?;
            write_text_element(&mut xml, "type", &dependency.kind)?;
            write_text_element(&mut xml, "classifier", &dependency.classifier)?;
            xml.write_event(Event::End(BytesEnd::new("dependency")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("dependencies")))?;
    }

    xml.write_event(Event::Start(BytesStart::new("repositories")))?;
    for repository in &build.repositories {
        xml.write_event(Event::Start(BytesStart::new("repository")))?;
        write_text_element(&mut xml, "id", &repository.id)?;
        write_text_element(&mut xml, "name", &repository.name)?;
        write_text_element(&mut xml, "url", &repository.url)?;
        write_text_element(&mut xml, "layout", &repository.layout)?;
        xml.write_event(Event::End(BytesEnd::new("repository")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("repositories")))?;

    xml.write_event(Event::Start(BytesStart::new("build")))?;
    write_text_element(&mut xml, "sourceDirectory", &build.build.source_directory)?;
    write_text_element(&mut xml, "directory", &build.build.directory)?;
    xml.write_event(Event::Start(BytesStart::new("plugins")))?;
    for group in group_by_plugin(&build.build.plugins) {
        write_plugin(&mut xml, group)?;
    }
    xml.write_event(Event::End(BytesEnd::new("plugins")))?;
    xml.write_event(Event::End(BytesEnd::new("build")))?;

    xml.write_event(Event::End(BytesEnd::new("project")))?;
    xml.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Split bindings into runs of consecutive bindings sharing plugin coordinates.
fn group_by_plugin(bindings: &[PluginBinding]) -> Vec<&[PluginBinding]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for index in 1..=bindings.len() {
        if index == bindings.len() || bindings[index].plugin != bindings[start].plugin {
            groups.push(&bindings[start..index]);
            start = index;
        }
    }
    groups
}

fn write_plugin<W: Write>(xml: &mut Writer<W>, group: &[PluginBinding]) -> Result<()> {
    let Some(first) = group.first() else {
        return Ok(());
    };
    let shared = group
        .iter()
        .all(|binding| binding.configuration == first.configuration);

    xml.write_event(Event::Start(BytesStart::new("plugin")))?;
    write_text_element(xml, "groupId", &first.plugin.group_id)?;
    write_text_element(xml, "artifactId", &first.plugin.artifact_id)?;
    write_text_element(xml, "version", &first.plugin.version)?;

    xml.write_event(Event::Start(BytesStart::new("executions")))?;
    for binding in group {
        xml.write_event(Event::Start(BytesStart::new("execution")))?;
        write_text_element(xml, "id", &binding.execution_id)?;
        write_text_element(xml, "phase", binding.phase.as_str())?;
        xml.write_event(Event::Start(BytesStart::new("goals")))?;
        for goal in &binding.goals {
            write_text_element(xml, "goal", goal)?;
        }
        xml.write_event(Event::End(BytesEnd::new("goals")))?;
        if !shared {
            write_configuration(xml, "configuration", &binding.configuration)?;
        }
        xml.write_event(Event::End(BytesEnd::new("execution")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("executions")))?;

    if shared {
        write_configuration(xml, "configuration", &first.configuration)?;
    }
    xml.write_event(Event::End(BytesEnd::new("plugin")))?;
    Ok(())
}

fn write_configuration<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    configuration: &Configuration,
) -> Result<()> {
    if configuration.is_empty() {
        return Ok(());
    }
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    for (key, value) in configuration.iter() {
        match value {
            ConfigValue::Text(text) => write_text_element(xml, key, text)?,
            ConfigValue::Nested(nested) => write_configuration(xml, key, nested)?,
        }
    }
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
