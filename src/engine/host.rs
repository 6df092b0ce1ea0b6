//! Default host page exposing the documented mount points.
//!
//! Real deployments serve their own markup; the viewer binary and the
//! pipeline only need the stable ids/classes to be present. Markup and CSS
//! are otherwise out of scope.

/// Baseline host markup: identity container, section containers, link list
/// container, site credit and the starfield canvas placeholder.
pub const DEFAULT_HOST_PAGE: &str = r#"<html>
<head>
    <meta charset="utf-8">
</head>
<body>
    <canvas id="starfield"></canvas>
    <main>
        <section id="home"></section>
        <section id="about"></section>
        <section id="links">
            <div id="all-links-container"></div>
        </section>
        <p class="site-credit"></p>
    </main>
</body>
</html>
"#;
