//! Tests for rg-graph: canonicalization policies, integrity, and output.

#[cfg(test)]
mod helpers {
    use rg_core::{GeoPoint, SourceId};
    use rg_source::{RawNetwork, RawNetworkBuilder};

    /// Two nodes, one edge without length or polyline.
    pub fn pair(length_m: Option<f64>) -> RawNetwork {
        let mut b = RawNetworkBuilder::new();
        let n1 = b.add_node(SourceId::from(1_i64), GeoPoint::new(49.0, -123.0)).unwrap();
        let n2 = b.add_node(SourceId::from(2_i64), GeoPoint::new(49.1, -123.1)).unwrap();
        b.add_edge(n1, n2, 0, length_m, None);
        b.build().unwrap()
    }

    /// Small mixed network:
    ///
    /// ```text
    ///   1 -> 2 (k0, k1)   2 -> 1 (k0, polyline)   1 -> 3 (k0)   4 isolated
    /// ```
    ///
    /// Node 3 only has an incoming edge; node 4 has none at all.
    pub fn mixed() -> RawNetwork {
        let mut b = RawNetworkBuilder::new();
        let n1 = b.add_node(SourceId::from(1_i64), GeoPoint::new(49.2827431, -123.1207376)).unwrap();
        let n2 = b.add_node(SourceId::from(2_i64), GeoPoint::new(49.2830001, -123.1150009)).unwrap();
        let n3 = b.add_node(SourceId::from(3_i64), GeoPoint::new(49.2790004, -123.1200001)).unwrap();
        b.add_node(SourceId::from(4_i64), GeoPoint::new(49.2700000, -123.1000000)).unwrap();

        b.add_edge(n1, n2, 0, Some(417.123_456), None);
        b.add_edge(n2, n1, 0, Some(430.5), Some(vec![
            GeoPoint::new(49.2830001, -123.1150009),
            GeoPoint::new(49.2835556, -123.1180004),
            GeoPoint::new(49.2827431, -123.1207376),
        ]));
        b.add_edge(n1, n2, 1, None, None);
        b.add_edge(n1, n3, 0, Some(420.0), None);
        b.build().unwrap()
    }
}

// ── Canonicalization policies ─────────────────────────────────────────────────

#[cfg(test)]
mod canonicalize {
    use crate::canonicalize::{resolve_weight, round_to};
    use crate::{check_integrity, edge_id, Canonicalizer, CoordPrecision, GraphError, LatLng};
    use rg_core::SourceId;

    #[test]
    fn edge_id_format() {
        assert_eq!(edge_id(&SourceId::from(1_i64), &SourceId::from(2_i64), 3), "1-2-3");
        assert_eq!(
            edge_id(&SourceId::from(25_734_191_i64), &SourceId::from(9_961_114_118_i64), 0),
            "25734191-9961114118-0"
        );
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round_to(12.345_678, 2), 12.35);
        assert_eq!(round_to(-123.120_737_6, 5), -123.12074);
        assert_eq!(resolve_weight(None), 0.0);
        assert_eq!(resolve_weight(Some(99.994)), 99.99);
    }

    #[test]
    fn rounding_follows_the_stored_binary_value() {
        // Both literals are stored just below their decimal midpoint.
        assert_eq!(resolve_weight(Some(2687.285)), 2687.28);
        assert_eq!(round_to(49.282745, 5), 49.28274);
        assert_eq!(CoordPrecision::Five.round(rg_core::GeoPoint::new(49.282745, -123.0)).lat, 49.28274);
        assert_eq!(round_to(-123.1207355, 6), -123.120735);
    }

    #[test]
    fn precision_from_decimals() {
        assert_eq!(CoordPrecision::try_from(5).unwrap(), CoordPrecision::Five);
        assert_eq!(CoordPrecision::try_from(6).unwrap(), CoordPrecision::Six);
        assert!(matches!(CoordPrecision::try_from(7), Err(GraphError::Precision(7))));
        assert_eq!(CoordPrecision::default().decimals(), 5);
    }

    #[test]
    fn missing_length_defaults_to_zero() {
        let doc = Canonicalizer::default().canonicalize(&super::helpers::pair(None));
        assert_eq!(doc.edges["1-2-0"].weight, 0.0);
        let json = String::from_utf8(doc.to_json_vec().unwrap()).unwrap();
        assert!(json.contains(r#""weight":0.0"#), "{json}");
    }

    #[test]
    fn no_polyline_yields_straight_segment() {
        let doc = Canonicalizer::default().canonicalize(&super::helpers::pair(Some(13_500.0)));
        let edge = &doc.edges["1-2-0"];
        assert_eq!(
            edge.geometry,
            [LatLng { lat: 49.0, lng: -123.0 }, LatLng { lat: 49.1, lng: -123.1 }]
        );
        assert_eq!(edge.geometry[0], doc.nodes["1"].position);
        assert_eq!(edge.geometry[1], doc.nodes["2"].position);

        let json = String::from_utf8(doc.to_json_vec().unwrap()).unwrap();
        assert!(
            json.contains(r#""geometry":[{"lat":49.0,"lng":-123.0},{"lat":49.1,"lng":-123.1}]"#),
            "{json}"
        );
    }

    #[test]
    fn parallel_edges_stay_distinct() {
        let doc = Canonicalizer::default().canonicalize(&super::helpers::mixed());
        assert!(doc.edges.contains_key("1-2-0"));
        assert!(doc.edges.contains_key("1-2-1"));
        // Source enumeration order within node 1: 1-2-0, 1-2-1, 1-3-0.
        assert_eq!(doc.nodes["1"].neighbors, ["1-2-0", "1-2-1", "1-3-0"]);
    }

    #[test]
    fn nodes_without_outgoing_edges_are_kept() {
        let doc = Canonicalizer::default().canonicalize(&super::helpers::mixed());
        assert_eq!(doc.node_count(), 4);
        assert!(doc.nodes["3"].neighbors.is_empty());
        assert!(doc.nodes["4"].neighbors.is_empty());
    }

    #[test]
    fn explicit_polyline_used_verbatim_and_rounded() {
        let net = super::helpers::mixed();

        let five = Canonicalizer::new(CoordPrecision::Five).canonicalize(&net);
        assert_eq!(
            five.edges["2-1-0"].geometry,
            [
                LatLng { lat: 49.283, lng: -123.115 },
                LatLng { lat: 49.28356, lng: -123.118 },
                LatLng { lat: 49.28274, lng: -123.12074 },
            ]
        );
        assert_eq!(five.nodes["1"].position, LatLng { lat: 49.28274, lng: -123.12074 });

        let six = Canonicalizer::new(CoordPrecision::Six).canonicalize(&net);
        assert_eq!(six.edges["2-1-0"].geometry[1], LatLng { lat: 49.283556, lng: -123.118 });
        assert_eq!(six.nodes["1"].position, LatLng { lat: 49.282743, lng: -123.120738 });
    }

    #[test]
    fn weights_have_at_most_two_decimals() {
        let doc = Canonicalizer::default().canonicalize(&super::helpers::mixed());
        assert_eq!(doc.edges["1-2-0"].weight, 417.12);
        assert_eq!(doc.edges["2-1-0"].weight, 430.5);

        let value: serde_json::Value = serde_json::from_slice(&doc.to_json_vec().unwrap()).unwrap();
        for edge in value["edges"].as_object().unwrap().values() {
            let text = edge["weight"].to_string();
            let decimals = text.split('.').nth(1).map_or(0, str::len);
            assert!(decimals <= 2, "weight {text}");
            assert!(edge["weight"].as_f64().unwrap() >= 0.0);
        }
    }

    #[test]
    fn adjacency_and_references_hold() {
        let doc = Canonicalizer::default().canonicalize(&super::helpers::mixed());
        check_integrity(&doc).unwrap();

        for (id, node) in &doc.nodes {
            let mut expected: Vec<&str> = doc
                .edges
                .values()
                .filter(|e| &e.from == id)
                .map(|e| e.id.as_str())
                .collect();
            let mut got: Vec<&str> = node.neighbors.iter().map(String::as_str).collect();
            expected.sort_unstable();
            got.sort_unstable();
            assert_eq!(got, expected, "node {id}");
        }
        for edge in doc.edges.values() {
            assert!(doc.nodes.contains_key(&edge.from));
            assert!(doc.nodes.contains_key(&edge.to));
            assert!(edge.geometry.len() >= 2);
        }
    }

    #[test]
    fn output_is_deterministic() {
        let c = Canonicalizer::default();
        let a = c.canonicalize(&super::helpers::mixed()).to_json_vec().unwrap();
        let b = c.canonicalize(&super::helpers::mixed()).to_json_vec().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn exact_document_shape() {
        let doc = Canonicalizer::default().canonicalize(&super::helpers::pair(Some(15.239)));
        let json = String::from_utf8(doc.to_json_vec().unwrap()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"nodes":{"#,
                r#""1":{"id":"1","position":{"lat":49.0,"lng":-123.0},"neighbors":["1-2-0"]},"#,
                r#""2":{"id":"2","position":{"lat":49.1,"lng":-123.1},"neighbors":[]}},"#,
                r#""edges":{"1-2-0":{"id":"1-2-0","from":"1","to":"2","weight":15.24,"#,
                r#""geometry":[{"lat":49.0,"lng":-123.0},{"lat":49.1,"lng":-123.1}]}}}"#,
            )
        );
    }
}

// ── Integrity checker ─────────────────────────────────────────────────────────

#[cfg(test)]
mod integrity {
    use crate::{check_integrity, Canonicalizer, GraphDocument, GraphError, LatLng};

    fn doc() -> GraphDocument {
        Canonicalizer::default().canonicalize(&super::helpers::mixed())
    }

    fn violation(doc: &GraphDocument) -> String {
        match check_integrity(doc) {
            Err(GraphError::Integrity(msg)) => msg,
            other => panic!("expected integrity violation, got {other:?}"),
        }
    }

    #[test]
    fn empty_document_passes() {
        check_integrity(&GraphDocument::default()).unwrap();
    }

    #[test]
    fn dangling_neighbor() {
        let mut d = doc();
        d.nodes.get_mut("4").unwrap().neighbors.push("4-9-0".into());
        assert!(violation(&d).contains("missing edge"));
    }

    #[test]
    fn neighbor_from_wrong_node() {
        let mut d = doc();
        d.nodes.get_mut("4").unwrap().neighbors.push("1-3-0".into());
        assert!(violation(&d).contains("starts at"));
    }

    #[test]
    fn unlisted_edge() {
        let mut d = doc();
        d.nodes.get_mut("1").unwrap().neighbors.retain(|e| e != "1-3-0");
        assert!(violation(&d).contains("neighbor entries"));
    }

    #[test]
    fn missing_endpoint() {
        let mut d = doc();
        d.nodes.remove("3");
        assert!(violation(&d).contains("missing node"));
    }

    #[test]
    fn short_geometry_and_bad_weight() {
        let mut d = doc();
        d.edges.get_mut("1-3-0").unwrap().geometry = vec![LatLng { lat: 0.0, lng: 0.0 }];
        assert!(violation(&d).contains("geometry"));

        let mut d = doc();
        d.edges.get_mut("1-3-0").unwrap().weight = -1.0;
        assert!(violation(&d).contains("weight"));
    }

    #[test]
    fn key_must_match_id() {
        let mut d = doc();
        let mut node = d.nodes.remove("4").unwrap();
        node.id = "5".into();
        d.nodes.insert("4".into(), node);
        assert!(violation(&d).contains("keyed"));
    }
}

// ── Writer ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod writer {
    use tempfile::TempDir;

    use rg_core::{BoundingBox, NetworkType, Region};
    use crate::writer::write_document;
    use crate::{Canonicalizer, GraphDocument, GraphError, GraphWriter};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn region() -> Region {
        Region::new("vancouver", "Vancouver", BoundingBox::new(49.38, 49.0, -122.5, -123.28), NetworkType::All)
    }

    fn entries(dir: &std::path::Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn writes_named_file_and_nothing_else() {
        let dir = tmp();
        let doc = Canonicalizer::default().canonicalize(&super::helpers::mixed());

        let out = GraphWriter::new(dir.path()).write(&region(), &doc).unwrap();
        assert_eq!(out.path, dir.path().join("vancouver-graph.json"));
        assert_eq!(entries(dir.path()), ["vancouver-graph.json"]);

        let bytes = std::fs::read(&out.path).unwrap();
        assert_eq!(bytes.len() as u64, out.bytes);
        assert_eq!(GraphDocument::from_json_slice(&bytes).unwrap(), doc);
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tmp();
        let nested = dir.path().join("backend").join("data");
        let doc = Canonicalizer::default().canonicalize(&super::helpers::pair(None));
        let out = GraphWriter::new(&nested).write(&region(), &doc).unwrap();
        assert!(out.path.starts_with(&nested));
        assert!(out.path.exists());
    }

    #[test]
    fn replaces_previous_document() {
        let dir = tmp();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, b"stale").unwrap();

        let doc = Canonicalizer::default().canonicalize(&super::helpers::pair(Some(1.0)));
        write_document(&path, &doc).unwrap();

        let back = GraphDocument::from_json_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(back, doc);
        assert_eq!(entries(dir.path()), ["graph.json"]);
    }

    #[test]
    fn unwritable_destination_leaves_nothing() {
        let dir = tmp();
        // A regular file where the output directory should be.
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, b"").unwrap();

        let doc = Canonicalizer::default().canonicalize(&super::helpers::pair(None));
        let err = GraphWriter::new(&blocker).write(&region(), &doc).unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
        assert_eq!(entries(dir.path()), ["data"]);
    }
}
