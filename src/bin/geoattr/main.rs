//! geoattr CLI - Inspect the attributes of demo geometries.

use geoattr::attribute::AttributeAccessor;
use geoattr::prelude::*;
use geoattr::provider::GeometryAttributeOwner;
use geoattr::util::Vec3;
use serde::Serialize;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "GEOATTR_LOG";

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    match filtered_args[0] {
        // List command - enumerate attributes
        "list" | "l" => {
            let Some(&kind) = filtered_args.get(1) else {
                eprintln!("Error: missing geometry argument");
                eprintln!("Usage: geoattr list <points|mesh|curves> [--json]");
                std::process::exit(1);
            };
            let json_mode = filtered_args.iter().any(|&s| s == "--json" || s == "-j");
            with_demo(kind, |attributes| cmd_list(attributes, json_mode));
        }

        // Show command - print attribute values
        "show" | "s" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: geoattr show <points|mesh|curves> <attribute>");
                std::process::exit(1);
            }
            let name = filtered_args[2];
            with_demo(filtered_args[1], |attributes| cmd_show(attributes, name));
        }

        // Domains command - domain sizes
        "domains" | "d" => {
            let Some(&kind) = filtered_args.get(1) else {
                eprintln!("Error: missing geometry argument");
                eprintln!("Usage: geoattr domains <points|mesh|curves>");
                std::process::exit(1);
            };
            with_demo(kind, cmd_domains);
        }

        "help" | "h" | "-h" | "--help" => print_help(),

        cmd => {
            eprintln!("Error: unknown command '{}'", cmd);
            eprintln!("Run 'geoattr help' for usage");
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("geoattr - Inspect geometry attributes");
    println!();
    println!("USAGE:");
    println!("    geoattr [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    l, list    <geometry> [--json]  List attributes with domain and type");
    println!("    s, show    <geometry> <name>    Print the values of one attribute");
    println!("    d, domains <geometry>           Show domain sizes");
    println!("    h, help                         Show this help");
    println!();
    println!("GEOMETRY:");
    println!("    points     Point cloud with radius and temperature");
    println!("    mesh       Two quads with materials and a vertex group");
    println!("    curves     Bezier and NURBS curves");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}       Log filter, overrides -v/-q (e.g. geoattr=trace)", LOG_ENV);
}

// ============================================================================
// Demo geometries
// ============================================================================

fn demo_points() -> Result<PointCloud> {
    let mut points = PointCloud::from_positions(vec![
        Vec3::ZERO,
        Vec3::X,
        Vec3::Y,
        Vec3::new(1.0, 1.0, 0.5),
    ]);
    let mut attributes = points.attributes_for_write();
    attributes.add("radius", AttrDomain::Point, AttrType::Float, AttributeInit::DefaultValue);
    let temperature = GArray::from_vec(vec![20.5f32, 21.0, 19.75, 22.25]);
    attributes.add("temperature", AttrDomain::Point, AttrType::Float, AttributeInit::Move(temperature));
    Ok(points)
}

fn demo_mesh() -> Result<Mesh> {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
    ];
    let mut mesh = Mesh::from_faces(positions, &[4, 4], &[0, 1, 4, 3, 1, 2, 5, 4])?;
    mesh.add_vertex_group("pin")?;
    let mut attributes = mesh.attributes_for_write();
    attributes.add(
        "material_index",
        AttrDomain::Face,
        AttrType::Int32,
        AttributeInit::Move(GArray::from_vec(vec![0i32, 1])),
    );
    attributes.add("uv_seam", AttrDomain::Edge, AttrType::Bool, AttributeInit::Zeroed);
    if let Some(mut pin) = attributes.lookup_for_write("pin") {
        if let Some(weights) = pin.typed_mut::<f32>() {
            weights[0] = 1.0;
            weights[3] = 0.5;
        }
        pin.finish();
    }
    Ok(mesh)
}

fn demo_curves() -> Result<Curves> {
    let mut curves = Curves::from_curve_sizes(&[4, 5]);
    for (i, p) in curves.positions_mut().iter_mut().enumerate() {
        *p = Vec3::new(i as f32, (i as f32 * 0.7).sin(), 0.0);
    }
    let mut attributes = curves.attributes_for_write();
    let types = GArray::from_vec(vec![CurveType::Bezier.to_i8(), CurveType::Nurbs.to_i8()]);
    attributes.add("curve_type", AttrDomain::Curve, AttrType::Int8, AttributeInit::Move(types));
    attributes.add("resolution", AttrDomain::Curve, AttrType::Int32, AttributeInit::DefaultValue);
    attributes.add("nurbs_order", AttrDomain::Curve, AttrType::Int8, AttributeInit::DefaultValue);
    Ok(curves)
}

/// Build the named demo geometry and run `f` on its attributes.
fn with_demo(kind: &str, f: impl FnOnce(&dyn Inspect)) {
    debug!("building demo geometry '{}'", kind);
    let result = match kind {
        "points" | "p" => demo_points().map(|g| f(&g.attributes())),
        "mesh" | "m" => demo_mesh().map(|g| f(&g.attributes())),
        "curves" | "c" => demo_curves().map(|g| f(&g.attributes())),
        _ => Err(Error::UnknownGeometry(kind.to_string())),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if matches!(e, Error::UnknownGeometry(_)) {
            eprintln!("Expected one of: points, mesh, curves");
        }
        std::process::exit(1);
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Attribute summary printed by `list`.
#[derive(Debug, Serialize)]
struct AttributeSummary {
    name: String,
    domain: AttrDomain,
    data_type: AttrType,
    builtin: bool,
    size: usize,
}

/// Object-safe view of an accessor, independent of the geometry type.
trait Inspect {
    fn summaries(&self) -> Vec<AttributeSummary>;
    fn reader(&self, name: &str) -> Option<AttributeReader<'_>>;
    fn domain_sizes(&self) -> Vec<(AttrDomain, usize)>;
}

impl<O: GeometryAttributeOwner> Inspect for AttributeAccessor<'_, O> {
    fn summaries(&self) -> Vec<AttributeSummary> {
        let mut out = Vec::new();
        self.foreach_attribute(|iter| {
            out.push(AttributeSummary {
                name: iter.name.to_string(),
                domain: iter.domain,
                data_type: iter.data_type,
                builtin: iter.is_builtin,
                size: self.domain_size(iter.domain),
            });
        });
        out
    }

    fn reader(&self, name: &str) -> Option<AttributeReader<'_>> {
        self.lookup(name)
    }

    fn domain_sizes(&self) -> Vec<(AttrDomain, usize)> {
        AttrDomain::ALL
            .iter()
            .filter(|&&domain| self.domain_supported(domain))
            .map(|&domain| (domain, self.domain_size(domain)))
            .collect()
    }
}

fn cmd_list(attributes: &dyn Inspect, json_mode: bool) {
    let summaries = attributes.summaries();
    info!("found {} attributes", summaries.len());
    if json_mode {
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }
    println!("{:<20} {:<10} {:<12} {:>6}  builtin", "NAME", "DOMAIN", "TYPE", "SIZE");
    for s in &summaries {
        println!(
            "{:<20} {:<10} {:<12} {:>6}  {}",
            s.name,
            s.domain.to_string(),
            s.data_type.to_string(),
            s.size,
            if s.builtin { "yes" } else { "" }
        );
    }
}

fn cmd_show(attributes: &dyn Inspect, name: &str) {
    let Some(reader) = attributes.reader(name) else {
        eprintln!("Error: no attribute named '{}'", name);
        std::process::exit(1);
    };
    println!("{} ({} on {}, {} values)", name, reader.data_type(), reader.domain, reader.len());
    for i in 0..reader.len() {
        if let Some(value) = reader.varray.get(i) {
            println!("  [{}] {:?}", i, value);
        }
    }
}

fn cmd_domains(attributes: &dyn Inspect) {
    for (domain, size) in attributes.domain_sizes() {
        println!("{:<10} {}", domain.to_string(), size);
    }
}
