//! Form pages served from memory; nothing is written to disk.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Image Converter and Resizer</title>
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }
        fieldset { margin-bottom: 15px; }
        label { display: block; margin-top: 8px; }
    </style>
</head>
<body>
    <h1>Image Converter and Resizer</h1>
    <p><a href="/batch">Batch upload</a></p>
    <form action="/convert" method="post" enctype="multipart/form-data">
        <fieldset>
            <label>Image (PNG, JPG, JPEG, GIF, WebP, BMP)
                <input type="file" name="file" accept=".png,.jpg,.jpeg,.gif,.webp,.bmp" required>
            </label>
            <label>Convert to
                <select name="format">
                    <option value="png">PNG</option>
                    <option value="jpg">JPG</option>
                    <option value="webp">WebP</option>
                    <option value="gif">GIF</option>
                    <option value="bmp">BMP</option>
                    <option value="tiff">TIFF</option>
                </select>
            </label>
        </fieldset>
        <fieldset>
            <label><input type="radio" name="resize" value="no" checked> Keep original size</label>
            <label><input type="radio" name="resize" value="yes"> Resize</label>
            <label>Width <input type="number" name="width" min="0"></label>
            <label>Height <input type="number" name="height" min="0"></label>
        </fieldset>
        <fieldset>
            <label>Quality (JPG/WebP, 1-100) <input type="number" name="quality" min="1" max="100"></label>
            <label>Compression (PNG, 0-9) <input type="number" name="compression" min="0" max="9" value="6"></label>
        </fieldset>
        <button type="submit">Convert</button>
    </form>
</body>
</html>
"#;

pub const BATCH_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Batch Image Converter</title>
</head>
<body>
    <h1>Batch Image Converter</h1>
    <p><a href="/">Single image</a></p>
    <form action="/batch" method="post" enctype="multipart/form-data">
        <label>Images <input type="file" name="files[]" multiple required></label>
        <label>Convert to
            <select name="format">
                <option value="png">PNG</option>
                <option value="jpg">JPG</option>
                <option value="webp">WebP</option>
            </select>
        </label>
        <button type="submit">Convert all</button>
    </form>
</body>
</html>
"#;
