fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use modelship_protocol::messages::{
        ChunkUploadResult, InitiateUploadRequest, InitiateUploadResponse, ModelAsset,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (key-order-independent comparison).
    ///
    /// The fixtures are verbatim copies of the backend's request and response
    /// bodies, so these tests pin the wire names against refactors.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  crate:   {reserialized}"
        );
    }

    // --- Upload protocol bodies ---

    #[test]
    fn fixture_initiate_request() {
        roundtrip_test::<InitiateUploadRequest>("initiate_request.json");
    }

    #[test]
    fn fixture_initiate_request_without_credit() {
        roundtrip_test::<InitiateUploadRequest>("initiate_request_no_credit.json");
    }

    #[test]
    fn fixture_initiate_response() {
        roundtrip_test::<InitiateUploadResponse>("initiate_response.json");
    }

    #[test]
    fn fixture_chunk_result() {
        roundtrip_test::<ChunkUploadResult>("chunk_result.json");
    }

    #[test]
    fn fixture_model_asset() {
        roundtrip_test::<ModelAsset>("model_asset.json");
    }

    #[test]
    fn initiate_request_omits_absent_credit() {
        let request = InitiateUploadRequest {
            res_type: "low".parse().unwrap(),
            credit: None,
            file_size: 1024,
            file_name: "model.glb".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("credit").is_none());
    }
}
