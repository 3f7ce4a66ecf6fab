//! Benchmarks for schema guessing and XSD extraction
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gml_schema::schema::{FieldType, SchemaConfig, guess_schema, guess_schema_with_config, parse_xsd};

/// Feature collection with `count` parcels, each carrying scalars and a polygon
fn sample_collection(count: usize) -> String {
    let mut doc = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml">
  <gml:boundedBy><gml:Envelope><gml:coordinates>0,0 1000,1000</gml:coordinates></gml:Envelope></gml:boundedBy>
  <gml:featureMembers>
"#,
    );
    for i in 0..count {
        doc.push_str(&format!(
            r#"    <parcel>
      <id>{i}</id>
      <area>{area}</area>
      <owner>Owner {i}</owner>
      <shape><gml:Polygon><gml:outerBoundaryIs><gml:LinearRing>
        <gml:coordinates>0,0 0,{i} {i},{i} 0,0</gml:coordinates>
      </gml:LinearRing></gml:outerBoundaryIs></gml:Polygon></shape>
    </parcel>
"#,
            i = i,
            area = i as f64 * 1.25
        ));
    }
    doc.push_str("  </gml:featureMembers>\n</wfs:FeatureCollection>\n");
    doc
}

fn sample_xsd() -> &'static str {
    r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:gml="http://www.opengis.net/gml">
  <xsd:element name="Parcel" type="ParcelType"/>
  <xsd:element name="Building" type="BuildingType"/>
  <xsd:complexType name="ParcelType">
    <xsd:complexContent>
      <xsd:extension base="gml:AbstractFeatureType">
        <xsd:sequence>
          <xsd:element name="id" type="xsd:integer"/>
          <xsd:element name="area" type="xsd:decimal"/>
          <xsd:element name="owner" type="xsd:string"/>
          <xsd:element name="shape" type="gml:PolygonPropertyType"/>
        </xsd:sequence>
      </xsd:extension>
    </xsd:complexContent>
  </xsd:complexType>
  <xsd:complexType name="BuildingType">
    <xsd:complexContent>
      <xsd:extension base="ParcelType">
        <xsd:sequence>
          <xsd:element name="height" type="xsd:decimal"/>
          <xsd:element ref="gml:location"/>
        </xsd:sequence>
      </xsd:extension>
    </xsd:complexContent>
  </xsd:complexType>
</xsd:schema>"#
}

fn bench_value_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_typing");

    for (name, value) in [("integer", "12345"), ("double", "-3.75e2"), ("string", "Main Street")] {
        group.bench_with_input(BenchmarkId::new("of_value", name), &value, |b, value| {
            b.iter(|| FieldType::of_value(black_box(value)))
        });
    }

    group.finish();
}

fn bench_guess_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("guess_schema");

    for count in [10usize, 100, 1000].iter() {
        let doc = sample_collection(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("full", count), &doc, |b, doc| {
            b.iter(|| guess_schema(black_box(doc.as_bytes())))
        });
    }

    let doc = sample_collection(1000);
    let config = SchemaConfig::builder().sample_size(10).build();
    group.bench_function("sampled_10_of_1000", |b| {
        b.iter(|| guess_schema_with_config(black_box(doc.as_bytes()), config.clone()))
    });

    group.finish();
}

fn bench_parse_xsd(c: &mut Criterion) {
    c.bench_function("parse_xsd", |b| b.iter(|| parse_xsd(black_box(sample_xsd()))));
}

criterion_group!(benches, bench_value_typing, bench_guess_schema, bench_parse_xsd);
criterion_main!(benches);
