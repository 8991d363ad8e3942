use dotenvy::dotenv;
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    /// Absolute origin used when building links to uploaded files
    pub public_base_url: String,
    pub upload_dir: PathBuf,
    pub vacation_days_per_year: i64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string())
                .trim_end_matches('/')
                .to_string(),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            vacation_days_per_year: env::var("VACATION_DAYS_PER_YEAR")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("VACATION_DAYS_PER_YEAR must be a number"),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "10485760".to_string())
                .parse()
                .expect("MAX_UPLOAD_BYTES must be a number"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.upload_dir.join("employee-photos")
    }

    pub fn dpi_scans_dir(&self) -> PathBuf {
        self.upload_dir.join("employee-dpi")
    }

    pub fn leave_documents_dir(&self) -> PathBuf {
        self.upload_dir.join("leave-documents")
    }

    pub fn photo_url(&self, file_name: &str) -> String {
        format!("{}/uploads/employee-photos/{}", self.public_base_url, file_name)
    }

    pub fn dpi_scan_url(&self, file_name: &str) -> String {
        format!("{}/uploads/employee-dpi/{}", self.public_base_url, file_name)
    }

    pub fn leave_document_url(&self, file_name: &str) -> String {
        format!("{}/uploads/leave-documents/{}", self.public_base_url, file_name)
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 4000,
            database_url: "postgres://localhost/muni_hr_test".to_string(),
            public_base_url: "http://localhost:4000".to_string(),
            upload_dir: env::temp_dir().join("muni-hr-tests"),
            vacation_days_per_year: 20,
            max_upload_bytes: 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_urls_use_public_base() {
        let config = Config::for_tests();
        assert_eq!(
            config.photo_url("photo-1.jpg"),
            "http://localhost:4000/uploads/employee-photos/photo-1.jpg"
        );
        assert_eq!(
            config.dpi_scan_url("dpi_scan-1.pdf"),
            "http://localhost:4000/uploads/employee-dpi/dpi_scan-1.pdf"
        );
        assert!(config.leave_documents_dir().ends_with("leave-documents"));
    }
}
