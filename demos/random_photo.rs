//! Example: Fetch a random photo for a phrase and a random photo near a place.

use flickfinder::{FlickrConfig, FlickrSearch, SearchCriteria};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    // Reads FLICKR_API_KEY
    let config = FlickrConfig::from_env()?;
    let search = FlickrSearch::new(config)?;

    let searches = [
        SearchCriteria::phrase("mountains"),
        // Paris
        SearchCriteria::location(48.8566, 2.3522),
    ];

    for criteria in &searches {
        println!("Searching for: {:?}", criteria);

        match search.search(criteria).await {
            Ok(photo) => {
                println!("   Title: {}", photo.title);
                println!("   URL: {}", photo.image_url);
                println!("   Page: {}", photo.page);
                if let Some(bytes) = photo.image_bytes() {
                    println!("   Image: {} bytes", bytes.len());
                }
            }
            Err(e) => println!("   {}", e.user_message()),
        }
        println!();
    }

    Ok(())
}
